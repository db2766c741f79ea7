use serde::{Deserialize, Serialize};

use super::engine::AnalysisResult;
use super::features::{ExtractedFeatures, TeamRole};
use super::parse::DevelopmentStage;
use super::valuation::{format_eur, RiskLevel};

/// Area of the project the input says nothing about
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingArea {
    Market,
    Competitive,
    Financial,
    Team,
    Product,
    BusinessModel,
    MarketValidation,
    GoToMarket,
    Funding,
}

impl MissingArea {
    pub fn label(&self) -> &'static str {
        match self {
            MissingArea::Market => "market analysis",
            MissingArea::Competitive => "competitive analysis",
            MissingArea::Financial => "financial projections",
            MissingArea::Team => "team",
            MissingArea::Product => "product description",
            MissingArea::BusinessModel => "business model",
            MissingArea::MarketValidation => "market validation",
            MissingArea::GoToMarket => "go-to-market strategy",
            MissingArea::Funding => "funding requirements",
        }
    }

    /// First concrete action that closes the gap
    fn action(&self) -> &'static str {
        match self {
            MissingArea::Market => "Describe the target customer and estimate TAM, SAM and SOM",
            MissingArea::Competitive => "List at least five direct and indirect competitors",
            MissingArea::Financial => "Draft a three-year revenue and cost projection",
            MissingArea::Team => "Document who is on the team and what each person brings",
            MissingArea::Product => "Write a one-page description of the product",
            MissingArea::BusinessModel => "Decide how the product will be priced and sold",
            MissingArea::MarketValidation => "Interview 20-30 potential customers",
            MissingArea::GoToMarket => "Pick the first acquisition channel and test it",
            MissingArea::Funding => "Quantify how much capital is needed and for how long",
        }
    }
}

impl std::fmt::Display for MissingArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Action plan split by horizon
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NextSteps {
    /// Next 30 days
    pub immediate: Vec<String>,
    /// Next 3 months
    pub short_term: Vec<String>,
    /// Next 12 months
    pub long_term: Vec<String>,
    pub funding_strategy: String,
}

pub fn missing_areas(features: &ExtractedFeatures) -> Vec<MissingArea> {
    let f = features;
    [
        (f.has_market_analysis, MissingArea::Market),
        (f.has_competitive_analysis, MissingArea::Competitive),
        (f.has_financial_projections, MissingArea::Financial),
        (f.has_team_info, MissingArea::Team),
        (f.has_product_description, MissingArea::Product),
        (f.has_business_model, MissingArea::BusinessModel),
        (f.has_market_validation, MissingArea::MarketValidation),
        (f.has_go_to_market, MissingArea::GoToMarket),
        (f.has_funding_request, MissingArea::Funding),
    ]
    .into_iter()
    .filter(|(present, _)| !present)
    .map(|(_, area)| area)
    .collect()
}

const CLOSING_RECOMMENDATIONS: [&str; 2] = [
    "Prepare a 10-15 slide pitch deck that tells the story from problem to ask.",
    "Repeat this analysis as the project evolves to track progress over time.",
];

pub fn recommendations(result: &AnalysisResult) -> Vec<String> {
    let f = &result.features;
    let mut recs: Vec<String> = Vec::new();

    if !f.has_market_analysis {
        recs.push(
            "Define the target market: who the customer is, how many there are, and how much \
             they spend on the problem today."
                .to_string(),
        );
    } else if f.market_size_eur.is_none() {
        recs.push("Put a number on the market size (TAM, SAM, SOM) with sources.".to_string());
    }

    if !f.has_market_validation {
        recs.push(
            "Validate demand before building more: customer interviews, a landing page with a \
             waiting list, or letters of intent."
                .to_string(),
        );
    }

    if !f.has_competitive_analysis {
        recs.push(
            "Map direct and indirect competitors and explain why customers would switch."
                .to_string(),
        );
    } else if !f.has_intellectual_property {
        recs.push(
            "Make the advantage over competitors defensible: proprietary data, network effects \
             or intellectual property."
                .to_string(),
        );
    }

    if !f.has_business_model {
        recs.push("Clarify the business model: who pays, how much and how often.".to_string());
    }
    if !f.has_financial_projections {
        recs.push(
            "Build a three-year financial plan with revenue, costs and break-even.".to_string(),
        );
    }

    if f.team_size <= 1 {
        recs.push("Look for co-founders with complementary skills.".to_string());
    } else if !f.team_roles.contains(&TeamRole::Technical) {
        recs.push("Bring technical skills into the founding team.".to_string());
    }
    if f.team_size > 0 && !f.has_experienced_team {
        recs.push("Highlight the founders' relevant experience and track record.".to_string());
    }

    match f.stage_or_idea() {
        DevelopmentStage::Idea => recs.push(
            "Build a prototype or MVP to test the core assumption with real users.".to_string(),
        ),
        DevelopmentStage::Prototype | DevelopmentStage::Mvp if !f.has_traction => recs.push(
            "Get the product in front of early adopters and measure usage.".to_string(),
        ),
        _ => {}
    }

    if !f.has_funding_request {
        recs.push("State how much funding is needed and which milestones it buys.".to_string());
    } else if !f.has_use_of_funds {
        recs.push("Break down the use of funds by area (product, sales, team).".to_string());
    }

    if result.risk.overall_level == RiskLevel::High {
        recs.push(format!(
            "Reduce the overall risk profile ({}% valuation discount) starting from the \
             high-risk areas.",
            result.risk.aggregate_risk_pct
        ));
    }

    recs.extend(CLOSING_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    recs
}

pub fn next_steps(result: &AnalysisResult) -> NextSteps {
    let f = &result.features;
    let stage = f.stage_or_idea();

    let mut immediate: Vec<String> = result
        .missing_areas
        .iter()
        .take(3)
        .map(|area| area.action().to_string())
        .collect();
    if immediate.is_empty() {
        immediate.push("Update the pitch deck with the latest metrics".to_string());
    }

    let mut short_term = vec![match stage {
        DevelopmentStage::Idea => "Build an MVP and test it with a first group of early adopters",
        DevelopmentStage::Prototype => "Turn the prototype into an MVP usable by real customers",
        DevelopmentStage::Mvp => "Convert beta users into paying customers",
        DevelopmentStage::Launched => "Optimise customer acquisition cost and retention",
        DevelopmentStage::Scaling => "Prepare the expansion into new markets",
    }
    .to_string()];
    if f.team_size < 3 {
        short_term.push("Complete the founding team with the missing key roles".to_string());
    }
    if !f.has_market_validation {
        short_term.push("Collect quantitative evidence of demand".to_string());
    }

    let long_term = vec![if result.overall_score >= 70 {
        "Close a funding round and hit the milestones that justify the next one"
    } else if result.overall_score >= 40 {
        "Reach product-market fit with measurable retention and growth"
    } else {
        "Reach the validation milestones needed before approaching investors"
    }
    .to_string()];

    let recommended = format_eur(result.valuation_range.recommended);
    let funding_strategy = match stage {
        DevelopmentStage::Idea | DevelopmentStage::Prototype => format!(
            "Bootstrapping, grants and pre-seed money from friends, family or business angels; \
             reference pre-money valuation {}.",
            recommended
        ),
        DevelopmentStage::Mvp => format!(
            "Pre-seed round from business angels or an accelerator program at around {} \
             pre-money.",
            recommended
        ),
        DevelopmentStage::Launched => format!(
            "Seed round with angels and early-stage funds, anchored on traction, at around {} \
             pre-money.",
            recommended
        ),
        DevelopmentStage::Scaling => format!(
            "Series A with venture capital funds; current metrics support at least {} pre-money.",
            recommended
        ),
    };

    NextSteps {
        immediate,
        short_term,
        long_term,
        funding_strategy,
    }
}

fn profile_phrase(score: u8) -> &'static str {
    match score {
        75..=100 => "a strong investment profile",
        55..=74 => "a promising profile with some gaps to close",
        35..=54 => "an early-stage profile that needs more work",
        _ => "a concept that is not yet ready for investors",
    }
}

pub fn executive_summary(result: &AnalysisResult) -> String {
    let mut paragraphs = Vec::new();

    paragraphs.push(format!(
        "{} receives an overall score of {}/100, {}. The project is at the {} stage.",
        result.project_name,
        result.overall_score,
        profile_phrase(result.overall_score),
        result.product.stage
    ));

    let areas = [
        ("market", result.market.score),
        ("team", result.team.score),
        ("product", result.product.score),
        ("financials", result.financial.score),
        ("competitive position", result.competitive.score),
    ];
    let strengths: Vec<&str> = areas.iter().filter(|(_, s)| *s >= 70.0).map(|(n, _)| *n).collect();
    let weaknesses: Vec<&str> = areas.iter().filter(|(_, s)| *s < 40.0).map(|(n, _)| *n).collect();

    let mut assessment = if strengths.is_empty() {
        "No area stands out yet as a clear strength.".to_string()
    } else {
        format!("Main strengths: {}.", strengths.join(", "))
    };
    if !weaknesses.is_empty() {
        assessment.push_str(&format!(" Areas to strengthen: {}.", weaknesses.join(", ")));
    }
    paragraphs.push(assessment);

    let range = &result.valuation_range;
    paragraphs.push(format!(
        "Combining the Berkus method ({}) and the Scorecard method ({}) with a {} risk profile \
         ({}% discount), the estimated pre-money valuation ranges from {} to {}, with {} as the \
         reference value.",
        format_eur(result.berkus.total),
        format_eur(result.scorecard.implied_valuation),
        result.risk.overall_level.label(),
        result.risk.aggregate_risk_pct,
        format_eur(range.min),
        format_eur(range.max),
        format_eur(range.recommended),
    ));

    paragraphs.push(match result.missing_areas.len() {
        0 => "The documentation covers every area investors look at; the next step is \
              investor outreach."
            .to_string(),
        1 => format!(
            "One area is still missing ({}); covering it is the fastest way to raise the score.",
            result.missing_areas[0]
        ),
        n => format!(
            "{} areas are still missing; covering them is the fastest way to raise the score.",
            n
        ),
    });

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{QuestionnaireData, StartupAnalyzer};

    fn analyze(data: QuestionnaireData) -> AnalysisResult {
        StartupAnalyzer::default().analyze_from_questionnaire(&data)
    }

    #[test]
    fn test_missing_areas_all_when_empty() {
        let areas = missing_areas(&ExtractedFeatures::default());
        assert_eq!(areas.len(), 9);
        assert_eq!(areas[0], MissingArea::Market);
    }

    #[test]
    fn test_missing_area_serializes_snake_case() {
        let json = serde_json::to_string(&MissingArea::BusinessModel).unwrap();
        assert_eq!(json, "\"business_model\"");
    }

    #[test]
    fn test_recommendations_end_with_closing() {
        let result = analyze(QuestionnaireData::default());
        let n = result.recommendations.len();
        assert!(n > 2);
        assert_eq!(result.recommendations[n - 2], CLOSING_RECOMMENDATIONS[0]);
        assert_eq!(result.recommendations[n - 1], CLOSING_RECOMMENDATIONS[1]);
    }

    #[test]
    fn test_recommendations_solo_founder() {
        let result = analyze(QuestionnaireData {
            team_size: "1".to_string(),
            ..Default::default()
        });
        assert!(result.recommendations.iter().any(|r| r.contains("co-founders")));
    }

    #[test]
    fn test_next_steps_follow_missing_areas() {
        let result = analyze(QuestionnaireData::default());
        assert_eq!(result.next_steps.immediate.len(), 3);
        assert_eq!(result.next_steps.immediate[0], MissingArea::Market.action());
        assert!(result.next_steps.funding_strategy.contains("Bootstrapping"));
    }

    #[test]
    fn test_next_steps_launched_stage() {
        let result = analyze(QuestionnaireData {
            development_stage: "Prodotto lanciato".to_string(),
            ..Default::default()
        });
        assert_eq!(
            result.next_steps.short_term[0],
            "Optimise customer acquisition cost and retention"
        );
        assert!(result.next_steps.funding_strategy.starts_with("Seed round"));
    }

    #[test]
    fn test_executive_summary_paragraphs() {
        let result = analyze(QuestionnaireData {
            project_name: "GreenBox".to_string(),
            ..Default::default()
        });
        let paragraphs: Vec<&str> = result.executive_summary.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 4);
        assert!(paragraphs[0].starts_with("GreenBox receives an overall score of"));
        assert!(paragraphs[0].contains("not yet ready for investors"));
        assert!(paragraphs[1].contains("No area stands out"));
        assert!(paragraphs[3].starts_with("9 areas are still missing"));
    }

    #[test]
    fn test_profile_phrase_bands() {
        assert_eq!(profile_phrase(100), "a strong investment profile");
        assert_eq!(profile_phrase(60), "a promising profile with some gaps to close");
        assert_eq!(profile_phrase(35), "an early-stage profile that needs more work");
        assert_eq!(profile_phrase(0), "a concept that is not yet ready for investors");
    }
}
