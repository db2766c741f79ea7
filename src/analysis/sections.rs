use serde::{Deserialize, Serialize};

use super::features::{ExtractedFeatures, TeamRole};
use super::parse::DevelopmentStage;
use super::valuation::format_eur;

/// Rough monthly cost of one team member, used to turn a funding request
/// into a runway estimate
const MONTHLY_COST_PER_PERSON: f64 = 5_000.0;

/// Roles an early team is expected to cover
const KEY_ROLES: [TeamRole; 3] = [TeamRole::Technical, TeamRole::Business, TeamRole::Marketing];

fn points(flag: bool, value: u32) -> u32 {
    if flag {
        value
    } else {
        0
    }
}

fn to_score(points: u32) -> f64 {
    f64::from(points.min(100))
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarketSize {
    Unknown,
    Niche,
    Medium,
    Large,
    Massive,
}

impl MarketSize {
    pub fn from_amount(amount: Option<f64>) -> Self {
        match amount {
            None => MarketSize::Unknown,
            Some(a) if a >= 1e9 => MarketSize::Massive,
            Some(a) if a >= 1e8 => MarketSize::Large,
            Some(a) if a >= 1e7 => MarketSize::Medium,
            Some(_) => MarketSize::Niche,
        }
    }

    fn points(&self) -> u32 {
        match self {
            MarketSize::Unknown => 0,
            MarketSize::Niche => 8,
            MarketSize::Medium => 15,
            MarketSize::Large => 22,
            MarketSize::Massive => 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MarketAnalysis {
    pub score: f64,
    pub market_size_eur: Option<f64>,
    pub size_category: MarketSize,
    pub validated: bool,
    pub reasoning: String,
}

pub fn analyze_market(features: &ExtractedFeatures) -> MarketAnalysis {
    let f = features;
    let size_category = MarketSize::from_amount(f.market_size_eur);
    let score = to_score(
        points(f.has_market_analysis, 30)
            + size_category.points()
            + points(f.has_market_validation, 25)
            + points(f.has_go_to_market, 15),
    );

    let size_text = match f.market_size_eur {
        Some(amount) => format!("The addressable market is estimated at {}.", format_eur(amount)),
        None => "The market size is not quantified.".to_string(),
    };
    let reasoning = match (f.has_market_analysis, f.has_market_validation) {
        (true, true) => format!(
            "Target market is defined and validated with potential customers. {}",
            size_text
        ),
        (true, false) => format!(
            "Target market is described but demand has not been validated yet. {}",
            size_text
        ),
        (false, true) => format!(
            "Some validation was done, but the target market is not clearly defined. {}",
            size_text
        ),
        (false, false) => {
            "No market analysis: target customers, market size and demand are all unknown."
                .to_string()
        }
    };

    MarketAnalysis {
        score,
        market_size_eur: f.market_size_eur,
        size_category,
        validated: f.has_market_validation,
        reasoning,
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompetitivePosition {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CompetitiveAnalysis {
    pub score: f64,
    pub competitors_identified: bool,
    pub protected_advantage: bool,
    pub position: CompetitivePosition,
    pub reasoning: String,
}

pub fn analyze_competitive(features: &ExtractedFeatures) -> CompetitiveAnalysis {
    let f = features;
    let score = to_score(
        points(f.has_competitive_analysis, 40)
            + points(f.has_intellectual_property, 25)
            + points(f.has_go_to_market, 15)
            + points(f.has_traction, 20),
    );
    let position = if score >= 70.0 {
        CompetitivePosition::Strong
    } else if score >= 40.0 {
        CompetitivePosition::Moderate
    } else {
        CompetitivePosition::Weak
    };

    let reasoning = if !f.has_competitive_analysis {
        "Competitors are not identified; investors will assume the founders have not looked."
            .to_string()
    } else if f.has_intellectual_property {
        "Competitors are mapped and the advantage is protected by intellectual property."
            .to_string()
    } else if f.has_traction {
        "Competitors are mapped; early traction is the main differentiator so far.".to_string()
    } else {
        "Competitors are mapped, but the advantage over them is not yet defensible.".to_string()
    };

    CompetitiveAnalysis {
        score,
        competitors_identified: f.has_competitive_analysis,
        protected_advantage: f.has_intellectual_property,
        position,
        reasoning,
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FinancialAnalysis {
    pub score: f64,
    pub has_business_model: bool,
    pub has_projections: bool,
    pub has_revenue: bool,
    pub funding_requested: Option<f64>,
    pub estimated_runway_months: Option<u32>,
    pub reasoning: String,
}

pub fn analyze_financial(features: &ExtractedFeatures) -> FinancialAnalysis {
    let f = features;
    let score = to_score(
        points(f.has_business_model, 25)
            + points(f.has_financial_projections, 25)
            + points(f.has_funding_request, 15)
            + points(f.has_use_of_funds, 15)
            + points(f.has_revenue, 20),
    );

    let monthly_burn = f64::from(f.team_size.max(1)) * MONTHLY_COST_PER_PERSON;
    let estimated_runway_months = f
        .funding_amount_eur
        .filter(|amount| *amount > 0.0)
        .map(|amount| (amount / monthly_burn).floor() as u32);

    let mut parts = Vec::new();
    parts.push(match (f.has_business_model, f.has_financial_projections) {
        (true, true) => "Business model and financial projections are both in place.",
        (true, false) => "The business model is defined but lacks financial projections.",
        (false, true) => "Projections exist without a clear business model behind them.",
        (false, false) => "Neither a business model nor financial projections are provided.",
    }
    .to_string());
    if f.has_revenue {
        parts.push("The startup already generates revenue.".to_string());
    }
    match (f.funding_amount_eur, estimated_runway_months) {
        (Some(amount), Some(months)) => parts.push(format!(
            "The requested {} covers roughly {} months at the current team size.",
            format_eur(amount),
            months
        )),
        _ if f.has_funding_request => {
            parts.push("Funding needs are mentioned but not quantified.".to_string())
        }
        _ => {}
    }

    FinancialAnalysis {
        score,
        has_business_model: f.has_business_model,
        has_projections: f.has_financial_projections,
        has_revenue: f.has_revenue,
        funding_requested: f.funding_amount_eur,
        estimated_runway_months,
        reasoning: parts.join(" "),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TeamAnalysis {
    pub score: f64,
    pub team_size: u32,
    pub experienced: bool,
    pub roles_covered: Vec<TeamRole>,
    pub missing_roles: Vec<TeamRole>,
    pub reasoning: String,
}

pub fn analyze_team(features: &ExtractedFeatures) -> TeamAnalysis {
    let f = features;
    let size_points = match f.team_size {
        0 => 0,
        1 => 15,
        2 => 30,
        3 | 4 => 45,
        _ => 55,
    };
    let role_points = (f.team_roles.len() as u32 * 5).min(20);
    let score = to_score(size_points + points(f.has_experienced_team, 25) + role_points);

    let missing_roles: Vec<TeamRole> = KEY_ROLES
        .into_iter()
        .filter(|role| !f.team_roles.contains(role))
        .collect();

    let size_text = match f.team_size {
        0 => "No information about the team.".to_string(),
        1 => "Solo founder: execution depends on a single person.".to_string(),
        n => format!("Founding team of {} people.", n),
    };
    let mut reasoning = size_text;
    if f.team_size > 0 {
        reasoning.push_str(if f.has_experienced_team {
            " The team brings relevant prior experience."
        } else {
            " Prior experience of the founders is not documented."
        });
        if !missing_roles.is_empty() {
            let names: Vec<&str> = missing_roles.iter().map(TeamRole::label).collect();
            reasoning.push_str(&format!(" Not covered: {}.", names.join(", ")));
        }
    }

    TeamAnalysis {
        score,
        team_size: f.team_size,
        experienced: f.has_experienced_team,
        roles_covered: f.team_roles.clone(),
        missing_roles,
        reasoning,
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProductAnalysis {
    pub score: f64,
    pub stage: DevelopmentStage,
    pub problem_defined: bool,
    pub protected: bool,
    pub has_traction: bool,
    pub reasoning: String,
}

pub fn analyze_product(features: &ExtractedFeatures) -> ProductAnalysis {
    let f = features;
    let stage = f.stage_or_idea();
    let stage_points = match stage {
        DevelopmentStage::Idea => 5,
        DevelopmentStage::Prototype => 30,
        DevelopmentStage::Mvp => 45,
        DevelopmentStage::Launched => 55,
        DevelopmentStage::Scaling => 60,
    };
    let score = to_score(
        stage_points
            + points(f.has_product_description, 15)
            + points(f.has_problem_statement, 10)
            + points(f.has_intellectual_property, 10)
            + points(f.has_traction, 5),
    );

    let stage_text = match stage {
        DevelopmentStage::Idea => "The product is still an idea.",
        DevelopmentStage::Prototype => "A prototype exists.",
        DevelopmentStage::Mvp => "An MVP is being tested with early users.",
        DevelopmentStage::Launched => "The product is on the market.",
        DevelopmentStage::Scaling => "The product is on the market and scaling.",
    };
    let fit_text = match (f.has_problem_statement, f.has_product_description) {
        (true, true) => "Problem and solution are both clearly described.",
        (true, false) => "The problem is clear, the solution is not described in detail.",
        (false, true) => "The solution is described without a clear problem statement.",
        (false, false) => "Neither the problem nor the solution is described.",
    };
    let mut reasoning = format!("{} {}", stage_text, fit_text);
    if f.has_intellectual_property {
        reasoning.push_str(" Intellectual property is protected.");
    }

    ProductAnalysis {
        score,
        stage,
        problem_defined: f.has_problem_statement,
        protected: f.has_intellectual_property,
        has_traction: f.has_traction,
        reasoning,
    }
}
