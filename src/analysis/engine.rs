use serde::{Deserialize, Serialize};

use super::config::{EngineConfig, ScoreWeights};
use super::features::ExtractedFeatures;
use super::input::{AnalysisInput, DocumentInput, InputMode, QuestionnaireData};
use super::narrative::{
    executive_summary, missing_areas, next_steps, recommendations, MissingArea, NextSteps,
};
use super::validation::validate_engine;
use super::sections::{
    analyze_competitive, analyze_financial, analyze_market, analyze_product, analyze_team,
    CompetitiveAnalysis, FinancialAnalysis, MarketAnalysis, ProductAnalysis, TeamAnalysis,
};
use super::valuation::{
    analyze_berkus, analyze_risk, analyze_scorecard, valuation_range, BerkusAnalysis,
    RiskAnalysis, ScorecardAnalysis, ValuationRange,
};

/// Everything the analyzer produces for one input
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalysisResult {
    pub project_name: String,
    pub mode: InputMode,
    pub overall_score: u8,
    pub valuation_range: ValuationRange,
    pub berkus: BerkusAnalysis,
    pub scorecard: ScorecardAnalysis,
    pub risk: RiskAnalysis,
    pub market: MarketAnalysis,
    pub competitive: CompetitiveAnalysis,
    pub financial: FinancialAnalysis,
    pub team: TeamAnalysis,
    pub product: ProductAnalysis,
    pub recommendations: Vec<String>,
    pub missing_areas: Vec<MissingArea>,
    pub next_steps: NextSteps,
    pub executive_summary: String,
    pub features: ExtractedFeatures,
}

/// Rule-based startup analyzer.
///
/// Stateless apart from its constants: the same input always yields the same
/// result.
#[derive(Debug, Clone, Default)]
pub struct StartupAnalyzer {
    config: EngineConfig,
}

impl StartupAnalyzer {
    /// Build an analyzer without checking the config.
    ///
    /// The config must pass [`validate_engine`]; a spread outside `[0, 1)` or
    /// weights that don't sum to 1 give meaningless scores and valuations.
    /// Prefer [`StartupAnalyzer::try_new`] for configs read from a file.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Build an analyzer, rejecting an invalid config with every problem found
    pub fn try_new(config: EngineConfig) -> Result<Self, Vec<String>> {
        validate_engine(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a structured questionnaire
    pub fn analyze_from_questionnaire(&self, data: &QuestionnaireData) -> AnalysisResult {
        let features = ExtractedFeatures::from_questionnaire(data);
        self.run(data.display_name().to_string(), InputMode::Questionnaire, features)
    }

    /// Analyze a free-text document
    pub fn analyze_startup(&self, doc: &DocumentInput) -> AnalysisResult {
        let features = ExtractedFeatures::from_document(doc);
        let title = doc.title.trim();
        let name = if title.is_empty() { "Untitled project" } else { title };
        self.run(name.to_string(), InputMode::Document, features)
    }

    pub fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        match input {
            AnalysisInput::Document(doc) => self.analyze_startup(doc),
            AnalysisInput::Questionnaire(data) => self.analyze_from_questionnaire(data),
        }
    }

    fn run(&self, project_name: String, mode: InputMode, features: ExtractedFeatures) -> AnalysisResult {
        let berkus = analyze_berkus(&features, self.config.effective_berkus_max());
        let scorecard = analyze_scorecard(&features, self.config.effective_scorecard_baseline());
        let risk = analyze_risk(&features);
        let market = analyze_market(&features);
        let competitive = analyze_competitive(&features);
        let financial = analyze_financial(&features);
        let team = analyze_team(&features);
        let product = analyze_product(&features);

        let overall_score = overall_score(
            &self.config.effective_weights(),
            &ComponentScores {
                market: market.score,
                team: team.score,
                product: product.score,
                financial: financial.score,
                berkus: berkus.score,
                scorecard: scorecard.score,
            },
        );
        let valuation_range =
            valuation_range(&berkus, &scorecard, &risk, self.config.effective_spread());

        let mut result = AnalysisResult {
            project_name,
            mode,
            overall_score,
            valuation_range,
            berkus,
            scorecard,
            risk,
            market,
            competitive,
            financial,
            team,
            product,
            recommendations: Vec::new(),
            missing_areas: Vec::new(),
            next_steps: NextSteps::default(),
            executive_summary: String::new(),
            features,
        };

        // Narrative reads the scores above, so it is filled in last
        result.missing_areas = missing_areas(&result.features);
        result.recommendations = recommendations(&result);
        result.next_steps = next_steps(&result);
        result.executive_summary = executive_summary(&result);
        result
    }
}

/// Component scores entering the overall score, each on 0-100
#[derive(Debug, Clone)]
pub struct ComponentScores {
    pub market: f64,
    pub team: f64,
    pub product: f64,
    pub financial: f64,
    pub berkus: f64,
    pub scorecard: f64,
}

/// Weighted sum of the component scores, each capped at 100 first
pub fn overall_score(weights: &ScoreWeights, scores: &ComponentScores) -> u8 {
    let cap = |s: f64| s.clamp(0.0, 100.0);
    let total = cap(scores.market) * weights.market
        + cap(scores.team) * weights.team
        + cap(scores.product) * weights.product
        + cap(scores.financial) * weights.financial
        + cap(scores.berkus) * weights.berkus
        + cap(scores.scorecard) * weights.scorecard;

    total.round().clamp(0.0, 100.0) as u8
}
