use serde::{Deserialize, Serialize};

/// Engine constants.
///
/// The defaults are the calibrated values every analysis has been produced
/// with; overriding them changes scores, so saved analyses are only
/// comparable when produced with the same config.
///
/// Example YAML:
/// ```yaml
/// engine:
///   weights:
///     market: 0.25
///     team: 0.20
///   berkus_category_max: 100000
///   scorecard_baseline: 1500000
///   valuation_spread: 0.3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Weights of the overall score components
    #[serde(default)]
    pub weights: Option<ScoreWeights>,

    /// Cap for each of the five Berkus categories, in euro (default: 100000)
    #[serde(default)]
    pub berkus_category_max: Option<f64>,

    /// Average pre-money valuation of comparable pre-revenue startups, the
    /// Scorecard method's reference point (default: 1500000)
    #[serde(default)]
    pub scorecard_baseline: Option<f64>,

    /// Relative width of the valuation range around the recommended value
    /// (default: 0.3, i.e. ±30%)
    #[serde(default)]
    pub valuation_spread: Option<f64>,
}

pub const DEFAULT_BERKUS_CATEGORY_MAX: f64 = 100_000.0;
pub const DEFAULT_SCORECARD_BASELINE: f64 = 1_500_000.0;
pub const DEFAULT_VALUATION_SPREAD: f64 = 0.3;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: Some(ScoreWeights::default()),
            berkus_category_max: Some(DEFAULT_BERKUS_CATEGORY_MAX),
            scorecard_baseline: Some(DEFAULT_SCORECARD_BASELINE),
            valuation_spread: Some(DEFAULT_VALUATION_SPREAD),
        }
    }
}

impl EngineConfig {
    pub fn effective_weights(&self) -> ScoreWeights {
        self.weights.clone().unwrap_or_default()
    }

    pub fn effective_berkus_max(&self) -> f64 {
        self.berkus_category_max.unwrap_or(DEFAULT_BERKUS_CATEGORY_MAX)
    }

    pub fn effective_scorecard_baseline(&self) -> f64 {
        self.scorecard_baseline.unwrap_or(DEFAULT_SCORECARD_BASELINE)
    }

    pub fn effective_spread(&self) -> f64 {
        self.valuation_spread.unwrap_or(DEFAULT_VALUATION_SPREAD)
    }
}

/// Weights of the overall score. Missing entries take their default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoreWeights {
    pub market: f64,
    pub team: f64,
    pub product: f64,
    pub financial: f64,
    pub berkus: f64,
    pub scorecard: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            market: 0.25,
            team: 0.20,
            product: 0.20,
            financial: 0.15,
            berkus: 0.10,
            scorecard: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.market + self.team + self.product + self.financial + self.berkus + self.scorecard
    }

    /// (name, weight) pairs, for validation messages
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("market", self.market),
            ("team", self.team),
            ("product", self.product),
            ("financial", self.financial),
            ("berkus", self.berkus),
            ("scorecard", self.scorecard),
        ]
    }
}
