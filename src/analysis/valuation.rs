use serde::{Deserialize, Serialize};

use super::features::ExtractedFeatures;
use super::parse::DevelopmentStage;

/// Berkus method: five pre-revenue value drivers, each worth up to
/// `category_max` euro.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BerkusAnalysis {
    pub sound_idea: f64,
    pub prototype: f64,
    pub quality_team: f64,
    pub strategic_relationships: f64,
    pub product_rollout: f64,
    pub total: f64,
    pub score: f64,
    pub reasoning: String,
}

impl BerkusAnalysis {
    fn categories(&self) -> [(&'static str, f64); 5] {
        [
            ("sound idea", self.sound_idea),
            ("prototype", self.prototype),
            ("quality team", self.quality_team),
            ("strategic relationships", self.strategic_relationships),
            ("product rollout", self.product_rollout),
        ]
    }
}

// Shares are whole percentages of a category so that full marks add up to
// exactly 100.

/// Share of a category reached by team size alone
fn team_size_share(size: u32) -> u32 {
    match size {
        0 => 0,
        1 => 20,
        2 => 40,
        3 | 4 => 60,
        _ => 80,
    }
}

fn stage_share(stage: DevelopmentStage) -> u32 {
    match stage {
        DevelopmentStage::Idea => 10,
        DevelopmentStage::Prototype => 50,
        DevelopmentStage::Mvp => 75,
        DevelopmentStage::Launched => 90,
        DevelopmentStage::Scaling => 100,
    }
}

/// Sum of the shares whose flag is set, capped at 100%
fn share(parts: &[(bool, u32)]) -> f64 {
    let pct: u32 = parts.iter().filter(|(on, _)| *on).map(|(_, s)| s).sum();
    f64::from(pct.min(100)) / 100.0
}

pub fn analyze_berkus(features: &ExtractedFeatures, category_max: f64) -> BerkusAnalysis {
    let f = features;
    let stage = f.stage_or_idea();

    let sound_idea = share(&[
        (f.has_problem_statement, 30),
        (f.has_product_description, 30),
        (f.has_market_analysis, 20),
        (f.has_business_model, 20),
    ]);
    let prototype = share(&[(true, stage_share(stage)), (f.has_intellectual_property, 10)]);
    let quality_team = share(&[
        (true, team_size_share(f.team_size)),
        (f.has_experienced_team, 20),
    ]);
    let strategic_relationships = share(&[
        (f.has_market_validation, 40),
        (f.has_go_to_market, 30),
        (f.has_competitive_analysis, 30),
    ]);
    let product_rollout = if f.has_traction || f.has_revenue {
        share(&[(f.has_traction, 50), (f.has_revenue, 50)])
    } else if stage >= DevelopmentStage::Launched {
        0.25
    } else {
        0.0
    };

    let mut analysis = BerkusAnalysis {
        sound_idea: sound_idea * category_max,
        prototype: prototype * category_max,
        quality_team: quality_team * category_max,
        strategic_relationships: strategic_relationships * category_max,
        product_rollout: product_rollout * category_max,
        total: 0.0,
        score: 0.0,
        reasoning: String::new(),
    };
    analysis.total = analysis.categories().iter().map(|(_, v)| v).sum();
    analysis.score = (analysis.total / (5.0 * category_max) * 100.0).clamp(0.0, 100.0);
    analysis.reasoning = berkus_reasoning(&analysis, category_max);
    analysis
}

fn berkus_reasoning(analysis: &BerkusAnalysis, category_max: f64) -> String {
    let categories = analysis.categories();
    // Ties go to the first category listed
    let strongest = categories
        .iter()
        .fold(categories[0], |best, c| if c.1 > best.1 { *c } else { best });
    let weakest = categories
        .iter()
        .fold(categories[0], |worst, c| if c.1 < worst.1 { *c } else { worst });

    let verdict = if analysis.score >= 70.0 {
        "Pre-revenue fundamentals are solid across most value drivers."
    } else if analysis.score >= 40.0 {
        "Some value drivers are in place, others still need to be de-risked."
    } else {
        "Most value drivers are still unproven at this stage."
    };

    format!(
        "{} Berkus value of {} out of a possible {}. Strongest driver: {} ({}); weakest: {} ({}).",
        verdict,
        format_eur(analysis.total),
        format_eur(5.0 * category_max),
        strongest.0,
        format_eur(strongest.1),
        weakest.0,
        format_eur(weakest.1),
    )
}

/// One Scorecard factor: weight of the factor and how the startup compares
/// with the average of its peers (1.0 = average, 0.5..=1.5)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScorecardFactor {
    pub name: String,
    pub weight: f64,
    pub multiplier: f64,
}

/// Scorecard (Payne) method: weighted comparison with an average
/// pre-money valuation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScorecardAnalysis {
    pub factors: Vec<ScorecardFactor>,
    pub adjustment_factor: f64,
    pub baseline_valuation: f64,
    pub implied_valuation: f64,
    pub score: f64,
    pub reasoning: String,
}

const MULTIPLIER_MIN: f64 = 0.5;
const MULTIPLIER_MAX: f64 = 1.5;

fn bonus(flag: bool, amount: f64) -> f64 {
    if flag {
        amount
    } else {
        0.0
    }
}

pub fn analyze_scorecard(features: &ExtractedFeatures, baseline: f64) -> ScorecardAnalysis {
    let f = features;

    let team = 0.5
        + match f.team_size {
            0 => 0.0,
            1 => 0.2,
            2 => 0.4,
            3 | 4 => 0.6,
            _ => 0.7,
        }
        + bonus(f.has_experienced_team, 0.3)
        + bonus(f.team_roles.len() >= 3, 0.1);

    let opportunity = match f.market_size_eur {
        Some(size) if size >= 1e9 => 1.5,
        Some(size) if size >= 1e8 => 1.25,
        Some(size) if size >= 1e7 => 1.0,
        Some(_) => 0.75,
        None if f.has_market_analysis => 0.9,
        None => 0.5,
    } + bonus(f.has_market_validation, 0.1);

    let product = match f.stage_or_idea() {
        DevelopmentStage::Idea => 0.6,
        DevelopmentStage::Prototype => 0.9,
        DevelopmentStage::Mvp => 1.1,
        DevelopmentStage::Launched => 1.3,
        DevelopmentStage::Scaling => 1.5,
    } + bonus(f.has_intellectual_property, 0.1);

    let competition = if f.has_competitive_analysis { 1.0 } else { 0.6 }
        + bonus(f.has_intellectual_property, 0.2);

    let marketing = if f.has_go_to_market { 1.1 } else { 0.6 } + bonus(f.has_traction, 0.2);

    let funding = if f.has_funding_request {
        1.0 + bonus(f.has_use_of_funds, 0.2) + bonus(f.has_revenue, 0.2)
    } else {
        0.8
    };

    let other = if f.has_business_model { 1.0 } else { 0.6 }
        + bonus(f.has_financial_projections, 0.2)
        + bonus(f.has_risk_assessment, 0.2);

    let factors: Vec<ScorecardFactor> = [
        ("Strength of the team", 0.30, team),
        ("Size of the opportunity", 0.25, opportunity),
        ("Product and technology", 0.15, product),
        ("Competitive environment", 0.10, competition),
        ("Marketing and sales channels", 0.10, marketing),
        ("Need for additional funding", 0.05, funding),
        ("Other factors", 0.05, other),
    ]
    .into_iter()
    .map(|(name, weight, multiplier)| ScorecardFactor {
        name: name.to_string(),
        weight,
        multiplier: f64::clamp(multiplier, MULTIPLIER_MIN, MULTIPLIER_MAX),
    })
    .collect();

    let adjustment_factor: f64 = factors.iter().map(|f| f.weight * f.multiplier).sum();
    let implied_valuation = baseline * adjustment_factor;
    let score = ((adjustment_factor - MULTIPLIER_MIN) / (MULTIPLIER_MAX - MULTIPLIER_MIN) * 100.0)
        .clamp(0.0, 100.0);

    let comparison = if adjustment_factor >= 1.15 {
        "clearly above"
    } else if adjustment_factor >= 0.95 {
        "in line with"
    } else {
        "below"
    };
    let reasoning = format!(
        "Compared with an average pre-money valuation of {}, the startup ranks {} its peers \
         (adjustment factor {:.2}), implying a valuation of about {}.",
        format_eur(baseline),
        comparison,
        adjustment_factor,
        format_eur(implied_valuation),
    );

    ScorecardAnalysis {
        factors,
        adjustment_factor,
        baseline_valuation: baseline,
        implied_valuation,
        score,
        reasoning,
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Valuation discount contributed by one risk at this level, in percent
    pub fn discount_pct(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => 5.0,
            RiskLevel::High => 10.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Management,
    Stage,
    Market,
    Competition,
    Funding,
    Technology,
    Legal,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Management => "management",
            RiskCategory::Stage => "stage of the business",
            RiskCategory::Market => "market",
            RiskCategory::Competition => "competition",
            RiskCategory::Funding => "funding",
            RiskCategory::Technology => "technology",
            RiskCategory::Legal => "legal",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskFactor {
    pub category: RiskCategory,
    pub level: RiskLevel,
    pub note: String,
}

/// Risk factor summation: every risk discounts the valuation by a fixed
/// percentage according to its level.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskAnalysis {
    pub factors: Vec<RiskFactor>,
    pub aggregate_risk_pct: f64,
    pub overall_level: RiskLevel,
    pub score: f64,
    pub reasoning: String,
}

const RISK_CATEGORY_COUNT: f64 = 7.0;

pub fn analyze_risk(features: &ExtractedFeatures) -> RiskAnalysis {
    let f = features;
    let stage = f.stage_or_idea();

    let management = if f.team_size == 0 {
        (RiskLevel::High, "No information about the founding team")
    } else if f.team_size >= 2 && f.has_experienced_team {
        (RiskLevel::Low, "Multi-founder team with relevant experience")
    } else {
        (RiskLevel::Medium, "Small or unproven team")
    };

    let stage_risk = match stage {
        DevelopmentStage::Idea => (RiskLevel::High, "Still at idea stage"),
        DevelopmentStage::Prototype | DevelopmentStage::Mvp => {
            (RiskLevel::Medium, "Product exists but is not on the market yet")
        }
        DevelopmentStage::Launched | DevelopmentStage::Scaling => {
            (RiskLevel::Low, "Product is on the market")
        }
    };

    let market = if !f.has_market_analysis {
        (RiskLevel::High, "Target market not described")
    } else if !f.has_market_validation {
        (RiskLevel::Medium, "Market described but not validated")
    } else {
        (RiskLevel::Low, "Market validated with real customers")
    };

    let competition = if !f.has_competitive_analysis {
        (RiskLevel::High, "Competitors not identified")
    } else if !f.has_intellectual_property {
        (RiskLevel::Medium, "Competitors known, no protected advantage")
    } else {
        (RiskLevel::Low, "Protected competitive advantage")
    };

    let funding = if f.has_revenue {
        (RiskLevel::Low, "Revenue already covers part of the needs")
    } else if !f.has_funding_request {
        (RiskLevel::High, "Funding needs not quantified")
    } else if !f.has_use_of_funds {
        (RiskLevel::Medium, "Funding requested without an allocation plan")
    } else {
        (RiskLevel::Low, "Funding request with allocation plan")
    };

    let technology = if !f.has_product_description {
        (RiskLevel::High, "Product or technology not described")
    } else if stage < DevelopmentStage::Mvp {
        (RiskLevel::Medium, "Technology not yet proven in a working product")
    } else {
        (RiskLevel::Low, "Working product available")
    };

    let legal = if f.has_intellectual_property {
        (RiskLevel::Low, "Intellectual property protected")
    } else {
        (RiskLevel::Medium, "No intellectual property protection mentioned")
    };

    let factors: Vec<RiskFactor> = [
        (RiskCategory::Management, management),
        (RiskCategory::Stage, stage_risk),
        (RiskCategory::Market, market),
        (RiskCategory::Competition, competition),
        (RiskCategory::Funding, funding),
        (RiskCategory::Technology, technology),
        (RiskCategory::Legal, legal),
    ]
    .into_iter()
    .map(|(category, (level, note))| RiskFactor {
        category,
        level,
        note: note.to_string(),
    })
    .collect();

    let aggregate_risk_pct: f64 = factors.iter().map(|r| r.level.discount_pct()).sum();
    let max_pct = RISK_CATEGORY_COUNT * RiskLevel::High.discount_pct();
    let score = (100.0 - aggregate_risk_pct / max_pct * 100.0).clamp(0.0, 100.0);
    let overall_level = if aggregate_risk_pct >= 45.0 {
        RiskLevel::High
    } else if aggregate_risk_pct >= 20.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let high: Vec<&str> = factors
        .iter()
        .filter(|r| r.level == RiskLevel::High)
        .map(|r| r.category.label())
        .collect();
    let reasoning = if high.is_empty() {
        format!(
            "Overall {} risk ({}% valuation discount); no category is rated high.",
            overall_level.label(),
            aggregate_risk_pct
        )
    } else {
        format!(
            "Overall {} risk ({}% valuation discount). High-risk areas: {}.",
            overall_level.label(),
            aggregate_risk_pct,
            high.join(", ")
        )
    };

    RiskAnalysis {
        factors,
        aggregate_risk_pct,
        overall_level,
        score,
        reasoning,
    }
}

/// Valuation range in euro, rounded to the nearest thousand
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ValuationRange {
    pub min: f64,
    pub recommended: f64,
    pub max: f64,
}

fn round_thousand(value: f64) -> f64 {
    (value / 1_000.0).round() * 1_000.0
}

/// Blend the Berkus total and the Scorecard valuation, discount by the
/// aggregate risk, then widen by `spread` on each side.
pub fn valuation_range(
    berkus: &BerkusAnalysis,
    scorecard: &ScorecardAnalysis,
    risk: &RiskAnalysis,
    spread: f64,
) -> ValuationRange {
    let blended = (berkus.total + scorecard.implied_valuation) / 2.0;
    let discount = (1.0 - risk.aggregate_risk_pct / 100.0).max(0.0);
    let recommended = (blended * discount).max(0.0);

    ValuationRange {
        min: round_thousand(recommended * (1.0 - spread)),
        recommended: round_thousand(recommended),
        max: round_thousand(recommended * (1.0 + spread)),
    }
}

/// Compact euro amount: "€850", "€12k", "€1.5M"
pub fn format_eur(amount: f64) -> String {
    let formatted = if amount.abs() >= 1_000_000_000.0 {
        format!("{:.1}B", amount / 1_000_000_000.0)
    } else if amount.abs() >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount.abs() >= 1_000.0 {
        format!("{:.0}k", amount / 1_000.0)
    } else {
        format!("{:.0}", amount)
    };

    // Trim trailing .0 (e.g., "1.0M" -> "1M")
    let trimmed = formatted.replace(".0B", "B").replace(".0M", "M");
    format!("€{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::TeamRole;

    fn rich_features() -> ExtractedFeatures {
        ExtractedFeatures {
            has_market_analysis: true,
            has_competitive_analysis: true,
            has_financial_projections: true,
            has_team_info: true,
            has_product_description: true,
            has_problem_statement: true,
            has_business_model: true,
            has_market_validation: true,
            has_traction: true,
            has_revenue: true,
            has_funding_request: true,
            has_use_of_funds: true,
            has_intellectual_property: true,
            has_go_to_market: true,
            has_risk_assessment: true,
            has_experienced_team: true,
            word_count: 800,
            team_size: 5,
            team_roles: vec![TeamRole::Technical, TeamRole::Business, TeamRole::Marketing],
            market_size_eur: Some(2e9),
            funding_amount_eur: Some(500_000.0),
            stage: Some(DevelopmentStage::Scaling),
        }
    }

    #[test]
    fn test_berkus_empty_features() {
        let berkus = analyze_berkus(&ExtractedFeatures::default(), 100_000.0);
        // Only the idea-stage prototype share is granted
        assert_eq!(berkus.prototype, 10_000.0);
        assert_eq!(berkus.sound_idea, 0.0);
        assert_eq!(berkus.total, 10_000.0);
        assert!((berkus.score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_berkus_categories_capped() {
        let berkus = analyze_berkus(&rich_features(), 100_000.0);
        assert_eq!(berkus.prototype, 100_000.0);
        assert_eq!(berkus.quality_team, 100_000.0);
        assert_eq!(berkus.total, 500_000.0);
        assert_eq!(berkus.score, 100.0);
        assert!(berkus.reasoning.contains("solid"));
    }

    #[test]
    fn test_berkus_launched_without_traction() {
        let features = ExtractedFeatures {
            stage: Some(DevelopmentStage::Launched),
            ..Default::default()
        };
        let berkus = analyze_berkus(&features, 100_000.0);
        assert_eq!(berkus.product_rollout, 25_000.0);
    }

    #[test]
    fn test_scorecard_multipliers_clamped() {
        let scorecard = analyze_scorecard(&rich_features(), 1_500_000.0);
        for factor in &scorecard.factors {
            assert!(factor.multiplier >= 0.5 && factor.multiplier <= 1.5);
        }
        assert_eq!(scorecard.factors.len(), 7);
        let weights: f64 = scorecard.factors.iter().map(|f| f.weight).sum();
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scorecard_weak_startup_below_baseline() {
        let scorecard = analyze_scorecard(&ExtractedFeatures::default(), 1_500_000.0);
        assert!(scorecard.implied_valuation < 1_500_000.0);
        assert!(scorecard.reasoning.contains("below"));
    }

    #[test]
    fn test_scorecard_strong_startup_above_baseline() {
        let scorecard = analyze_scorecard(&rich_features(), 1_500_000.0);
        assert!(scorecard.adjustment_factor > 1.15);
        assert!(scorecard.score > 70.0);
    }

    #[test]
    fn test_risk_empty_features() {
        let risk = analyze_risk(&ExtractedFeatures::default());
        // Six high risks and a medium legal risk
        assert_eq!(risk.aggregate_risk_pct, 65.0);
        assert_eq!(risk.overall_level, RiskLevel::High);
        assert!(risk.reasoning.contains("management"));
    }

    #[test]
    fn test_risk_rich_features() {
        let risk = analyze_risk(&rich_features());
        assert_eq!(risk.aggregate_risk_pct, 0.0);
        assert_eq!(risk.overall_level, RiskLevel::Low);
        assert_eq!(risk.score, 100.0);
    }

    #[test]
    fn test_valuation_range_ordering_and_rounding() {
        let features = rich_features();
        let berkus = analyze_berkus(&features, 100_000.0);
        let scorecard = analyze_scorecard(&features, 1_500_000.0);
        let risk = analyze_risk(&features);
        let range = valuation_range(&berkus, &scorecard, &risk, 0.3);

        assert!(range.min <= range.recommended && range.recommended <= range.max);
        assert_eq!(range.recommended % 1_000.0, 0.0);
    }

    #[test]
    fn test_valuation_applies_risk_discount() {
        let features = ExtractedFeatures::default();
        let berkus = analyze_berkus(&features, 100_000.0);
        let scorecard = analyze_scorecard(&features, 1_500_000.0);
        let risk = analyze_risk(&features);
        let range = valuation_range(&berkus, &scorecard, &risk, 0.3);

        // (10k Berkus + 832.5k Scorecard) / 2, minus the 65% risk discount
        assert_eq!(range.recommended, 147_000.0);
        assert_eq!(range.min, 103_000.0);
        assert_eq!(range.max, 192_000.0);
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(850.0), "€850");
        assert_eq!(format_eur(12_000.0), "€12k");
        assert_eq!(format_eur(1_000_000.0), "€1M");
        assert_eq!(format_eur(1_500_000.0), "€1.5M");
        assert_eq!(format_eur(2_000_000_000.0), "€2B");
    }
}
