use serde::{Deserialize, Serialize};

/// Free-text pitch document (business plan, executive summary, notes).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DocumentInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Structured questionnaire as filled in by the project wizard.
///
/// Every field is free text and optional: an empty or blank string means the
/// founder skipped the question. Both snake_case and the camelCase names used
/// by the browser JSON blobs are accepted. Unknown keys are rejected so a
/// misspelled question is not silently dropped.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuestionnaireData {
    #[serde(alias = "projectName")]
    pub project_name: String,
    #[serde(alias = "projectDescription")]
    pub project_description: String,
    pub problem: String,
    pub solution: String,
    #[serde(alias = "targetMarket")]
    pub target_market: String,
    #[serde(alias = "marketSize")]
    pub market_size: String,
    #[serde(alias = "marketValidation")]
    pub market_validation: String,
    pub competitors: String,
    #[serde(alias = "competitiveAdvantage")]
    pub competitive_advantage: String,
    #[serde(alias = "businessModel")]
    pub business_model: String,
    #[serde(alias = "revenueProjections")]
    pub revenue_projections: String,
    #[serde(alias = "fundingNeeds")]
    pub funding_needs: String,
    #[serde(alias = "useOfFunds")]
    pub use_of_funds: String,
    #[serde(alias = "teamSize")]
    pub team_size: String,
    #[serde(alias = "teamExperience")]
    pub team_experience: String,
    #[serde(alias = "teamRoles")]
    pub team_roles: String,
    #[serde(alias = "developmentStage")]
    pub development_stage: String,
    pub traction: String,
    #[serde(alias = "intellectualProperty")]
    pub intellectual_property: String,
    #[serde(alias = "goToMarket")]
    pub go_to_market: String,
    pub risks: String,
}

impl QuestionnaireData {
    /// Project name, falling back to a placeholder when left blank
    pub fn display_name(&self) -> &str {
        let name = self.project_name.trim();
        if name.is_empty() {
            "Untitled project"
        } else {
            name
        }
    }

    /// All answers joined into one lower-cased blob, for keyword lookups
    pub fn combined_text(&self) -> String {
        [
            &self.project_description,
            &self.problem,
            &self.solution,
            &self.target_market,
            &self.market_size,
            &self.market_validation,
            &self.competitors,
            &self.competitive_advantage,
            &self.business_model,
            &self.revenue_projections,
            &self.funding_needs,
            &self.use_of_funds,
            &self.team_size,
            &self.team_experience,
            &self.team_roles,
            &self.development_stage,
            &self.traction,
            &self.intellectual_property,
            &self.go_to_market,
            &self.risks,
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

/// Input accepted by the analyzer: a free-text document or a questionnaire.
///
/// Serialized with a `mode` tag so a saved input file can say which one it is:
/// ```yaml
/// mode: document
/// title: "GreenBox"
/// content: "..."
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisInput {
    Document(DocumentInput),
    Questionnaire(QuestionnaireData),
}

/// Which entry point produced a result
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Document,
    Questionnaire,
}

impl AnalysisInput {
    pub fn mode(&self) -> InputMode {
        match self {
            AnalysisInput::Document(_) => InputMode::Document,
            AnalysisInput::Questionnaire(_) => InputMode::Questionnaire,
        }
    }
}
