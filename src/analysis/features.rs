use serde::{Deserialize, Serialize};

use super::input::{DocumentInput, QuestionnaireData};
use super::parse::{
    contains_any, count_before, parse_amount, parse_team_size, word_count, DevelopmentStage,
};

// Keyword lists are matched as plain substrings of the lower-cased text.
const MARKET_KEYWORDS: &[&str] = &["mercato", "market", "target", "segmento", "segment", "clienti", "customers"];
const COMPETITIVE_KEYWORDS: &[&str] = &[
    "concorren",
    "competitor",
    "competition",
    "competitiv",
    "differenzia",
    "alternative",
];
const FINANCIAL_KEYWORDS: &[&str] = &[
    "ricavi",
    "revenue",
    "fatturato",
    "proiezion",
    "projection",
    "budget",
    "margin",
    "break-even",
    "break even",
    "cash flow",
    "flusso di cassa",
];
const TEAM_KEYWORDS: &[&str] = &["team", "founder", "fondator", "ceo", "cto", "soci"];
const PRODUCT_KEYWORDS: &[&str] = &[
    "prodotto",
    "product",
    "piattaforma",
    "platform",
    "app",
    "soluzione",
    "solution",
    "servizio",
    "service",
    "tecnologia",
    "technology",
];
const PROBLEM_KEYWORDS: &[&str] = &["problema", "problem", "pain point", "bisogno", "esigenza", "need"];
const BUSINESS_MODEL_KEYWORDS: &[&str] = &[
    "modello di business",
    "business model",
    "abbonamento",
    "subscription",
    "saas",
    "commission",
    "freemium",
    "licenz",
    "licens",
    "pricing",
];
const VALIDATION_KEYWORDS: &[&str] = &[
    "validat",
    "validaz",
    "intervist",
    "interview",
    "sondaggi",
    "survey",
    "lettere di intent",
    "letter of intent",
    "lista d'attesa",
    "waiting list",
    "waitlist",
    "pre-ordin",
    "pre-order",
];
const TRACTION_KEYWORDS: &[&str] = &[
    "trazione",
    "traction",
    "utenti",
    "users",
    "clienti paganti",
    "paying customers",
    "download",
    "mrr",
];
const REVENUE_KEYWORDS: &[&str] = &[
    "fatturato",
    "ricavi",
    "revenue",
    "mrr",
    "vendite",
    "sales",
    "clienti paganti",
    "paying customers",
];
const FUNDING_KEYWORDS: &[&str] = &[
    "finanziament",
    "funding",
    "investiment",
    "investment",
    "round",
    "seed",
    "raccolta",
    "raise",
    "capitale",
];
const USE_OF_FUNDS_KEYWORDS: &[&str] = &[
    "utilizzo dei fondi",
    "uso dei fondi",
    "use of funds",
    "allocazione",
    "allocation",
];
const IP_KEYWORDS: &[&str] = &[
    "brevett",
    "patent",
    "proprietà intellettuale",
    "intellectual property",
    "trademark",
    "marchio registrato",
    "copyright",
];
const GO_TO_MARKET_KEYWORDS: &[&str] = &[
    "go-to-market",
    "go to market",
    "marketing",
    "canali",
    "channels",
    "distribuzione",
    "distribution",
    "acquisizione clienti",
    "customer acquisition",
];
const RISK_KEYWORDS: &[&str] = &["rischi", "risk", "minacce", "threat", "mitigazion", "mitigation"];
const EXPERIENCE_KEYWORDS: &[&str] = &[
    "esperienza",
    "experience",
    "exit",
    "serial",
    "seriale",
    "phd",
    "dottorato",
    "mba",
    "senior",
];
const TEAM_SIZE_UNITS: &[&str] = &[
    "persone",
    "people",
    "membri",
    "members",
    "founder",
    "fondator",
    "co-founder",
    "cofounder",
    "soci",
];
const MARKET_SIZE_KEYWORDS: &[&str] = &["mercato", "market", "tam"];

// Answers that mean "nothing here" in an otherwise filled field
const EMPTY_ANSWERS: &[&str] = &["no", "none", "nessuno", "nessuna", "n/a", "-", "non ancora", "not yet"];

/// Role covered by the founding team
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Technical,
    Business,
    Marketing,
    Design,
    Finance,
}

impl TeamRole {
    const ALL: [TeamRole; 5] = [
        TeamRole::Technical,
        TeamRole::Business,
        TeamRole::Marketing,
        TeamRole::Design,
        TeamRole::Finance,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            TeamRole::Technical => &["cto", "developer", "sviluppator", "engineer", "ingegner", "programmat"],
            TeamRole::Business => &["ceo", "coo", "business", "operations", "strateg"],
            TeamRole::Marketing => &["marketing", "sales", "vendite", "growth", "cmo", "commerciale"],
            TeamRole::Design => &["design", "ux", "grafic"],
            TeamRole::Finance => &["cfo", "finance", "finanz", "contabil"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeamRole::Technical => "technical",
            TeamRole::Business => "business",
            TeamRole::Marketing => "marketing & sales",
            TeamRole::Design => "design",
            TeamRole::Finance => "finance",
        }
    }

    fn detect(text: &str) -> Vec<TeamRole> {
        TeamRole::ALL
            .into_iter()
            .filter(|role| contains_any(text, role.keywords()))
            .collect()
    }
}

/// Flags and numbers derived once from the input. Every sub-analysis reads
/// from here rather than from the raw input.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ExtractedFeatures {
    pub has_market_analysis: bool,
    pub has_competitive_analysis: bool,
    pub has_financial_projections: bool,
    pub has_team_info: bool,
    pub has_product_description: bool,
    pub has_problem_statement: bool,
    pub has_business_model: bool,
    pub has_market_validation: bool,
    pub has_traction: bool,
    pub has_revenue: bool,
    pub has_funding_request: bool,
    pub has_use_of_funds: bool,
    pub has_intellectual_property: bool,
    pub has_go_to_market: bool,
    pub has_risk_assessment: bool,
    pub has_experienced_team: bool,
    pub word_count: usize,
    pub team_size: u32,
    pub team_roles: Vec<TeamRole>,
    pub market_size_eur: Option<f64>,
    pub funding_amount_eur: Option<f64>,
    pub stage: Option<DevelopmentStage>,
}

impl ExtractedFeatures {
    /// Extract features from a free-text document via keyword presence
    pub fn from_document(doc: &DocumentInput) -> Self {
        let text = format!("{}\n{}", doc.title, doc.content).to_lowercase();
        let has = |keywords: &[&str]| contains_any(&text, keywords);

        let has_team_info = has(TEAM_KEYWORDS);
        let team_size = count_before(&text, TEAM_SIZE_UNITS)
            .unwrap_or(if has_team_info { 1 } else { 0 });

        Self {
            has_market_analysis: has(MARKET_KEYWORDS),
            has_competitive_analysis: has(COMPETITIVE_KEYWORDS),
            has_financial_projections: has(FINANCIAL_KEYWORDS),
            has_team_info,
            has_product_description: has(PRODUCT_KEYWORDS),
            has_problem_statement: has(PROBLEM_KEYWORDS),
            has_business_model: has(BUSINESS_MODEL_KEYWORDS),
            has_market_validation: has(VALIDATION_KEYWORDS),
            has_traction: has(TRACTION_KEYWORDS),
            has_revenue: has(REVENUE_KEYWORDS),
            has_funding_request: has(FUNDING_KEYWORDS),
            has_use_of_funds: has(USE_OF_FUNDS_KEYWORDS),
            has_intellectual_property: has(IP_KEYWORDS),
            has_go_to_market: has(GO_TO_MARKET_KEYWORDS),
            has_risk_assessment: has(RISK_KEYWORDS),
            has_experienced_team: has_team_info && has(EXPERIENCE_KEYWORDS),
            word_count: word_count(&text),
            team_size,
            team_roles: TeamRole::detect(&text),
            market_size_eur: amount_near(&text, MARKET_SIZE_KEYWORDS),
            funding_amount_eur: amount_near(&text, FUNDING_KEYWORDS),
            stage: Some(DevelopmentStage::detect(&text)),
        }
    }

    /// Extract features from a questionnaire via field presence
    pub fn from_questionnaire(data: &QuestionnaireData) -> Self {
        let traction = data.traction.to_lowercase();
        let experience = data.team_experience.to_lowercase();
        let roles_text = format!("{} {}", data.team_roles, data.team_experience).to_lowercase();
        let stage_text = format!("{} {}", data.development_stage, data.traction);

        let has_team_info =
            filled(&data.team_size) || filled(&data.team_experience) || filled(&data.team_roles);
        let stage = if filled(&stage_text) {
            Some(DevelopmentStage::detect(&stage_text))
        } else {
            None
        };

        Self {
            has_market_analysis: filled(&data.target_market) || filled(&data.market_size),
            has_competitive_analysis: filled(&data.competitors)
                || filled(&data.competitive_advantage),
            has_financial_projections: filled(&data.revenue_projections),
            has_team_info,
            has_product_description: filled(&data.solution) || filled(&data.project_description),
            has_problem_statement: filled(&data.problem),
            has_business_model: filled(&data.business_model),
            has_market_validation: filled(&data.market_validation),
            has_traction: filled(&data.traction),
            has_revenue: contains_any(&traction, REVENUE_KEYWORDS),
            has_funding_request: filled(&data.funding_needs),
            has_use_of_funds: filled(&data.use_of_funds),
            has_intellectual_property: answered(&data.intellectual_property),
            has_go_to_market: filled(&data.go_to_market),
            has_risk_assessment: filled(&data.risks),
            has_experienced_team: contains_any(&experience, EXPERIENCE_KEYWORDS),
            word_count: word_count(&data.combined_text()),
            team_size: parse_team_size(&data.team_size),
            team_roles: TeamRole::detect(&roles_text),
            market_size_eur: parse_amount(&data.market_size),
            funding_amount_eur: parse_amount(&data.funding_needs),
            stage,
        }
    }

    /// Stage for scoring purposes; unknown counts as idea
    pub fn stage_or_idea(&self) -> DevelopmentStage {
        self.stage.unwrap_or(DevelopmentStage::Idea)
    }
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn answered(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    !s.is_empty() && !EMPTY_ANSWERS.contains(&s.as_str())
}

/// First amount mentioned in a sentence that also mentions one of the keywords
fn amount_near(text: &str, keywords: &[&str]) -> Option<f64> {
    text.split(['\n', ';', '!', '?'])
        .flat_map(|line| line.split(". "))
        .filter(|sentence| contains_any(sentence, keywords))
        .find_map(parse_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> DocumentInput {
        DocumentInput {
            title: "Pitch".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_empty_document_has_no_features() {
        let features = ExtractedFeatures::from_document(&DocumentInput::default());
        assert!(!features.has_market_analysis);
        assert!(!features.has_team_info);
        assert_eq!(features.team_size, 0);
        assert_eq!(features.word_count, 0);
        assert_eq!(features.stage, Some(DevelopmentStage::Idea));
    }

    #[test]
    fn test_document_keyword_detection() {
        let features = ExtractedFeatures::from_document(&doc(
            "Il nostro mercato vale 2 miliardi. Il team è composto da 3 persone con esperienza. \
             Abbiamo un MVP e un modello di business in abbonamento.",
        ));
        assert!(features.has_market_analysis);
        assert!(features.has_team_info);
        assert!(features.has_experienced_team);
        assert!(features.has_business_model);
        assert_eq!(features.team_size, 3);
        assert_eq!(features.market_size_eur, Some(2_000_000_000.0));
        assert_eq!(features.stage, Some(DevelopmentStage::Mvp));
    }

    #[test]
    fn test_document_keyword_false_positive_is_kept() {
        // "supermercato" contains "mercato"; substring matching counts it
        let features = ExtractedFeatures::from_document(&doc("Ho fatto la spesa al supermercato."));
        assert!(features.has_market_analysis);
    }

    #[test]
    fn test_document_funding_amount() {
        let features = ExtractedFeatures::from_document(&doc(
            "Siamo in 2.\nCerchiamo un round seed da 400k per 18 mesi.",
        ));
        assert!(features.has_funding_request);
        assert_eq!(features.funding_amount_eur, Some(400_000.0));
    }

    #[test]
    fn test_document_funding_request_is_not_revenue() {
        let features = ExtractedFeatures::from_document(&doc(
            "Siamo all'idea. Cerchiamo un finanziamento di €200k.",
        ));
        assert!(features.has_funding_request);
        assert!(!features.has_revenue);
        assert!(!features.has_traction);
    }

    #[test]
    fn test_questionnaire_traction_amount_alone_is_not_revenue() {
        let data = QuestionnaireData {
            traction: "Waiting list da 300 iscritti, costo di sviluppo €20k".to_string(),
            ..Default::default()
        };
        let features = ExtractedFeatures::from_questionnaire(&data);
        assert!(features.has_traction);
        assert!(!features.has_revenue);
    }

    #[test]
    fn test_questionnaire_field_presence() {
        let data = QuestionnaireData {
            project_name: "GreenBox".to_string(),
            target_market: "PMI italiane".to_string(),
            market_size: "€1,5 miliardi".to_string(),
            team_size: "5+ persone".to_string(),
            team_experience: "10 anni di esperienza in logistica".to_string(),
            team_roles: "CEO, CTO, responsabile marketing".to_string(),
            traction: "200 clienti paganti".to_string(),
            ..Default::default()
        };
        let features = ExtractedFeatures::from_questionnaire(&data);
        assert!(features.has_market_analysis);
        assert!(features.has_team_info);
        assert!(features.has_experienced_team);
        assert!(features.has_traction);
        assert!(features.has_revenue);
        assert!(!features.has_competitive_analysis);
        assert_eq!(features.team_size, 5);
        assert_eq!(features.market_size_eur, Some(1_500_000_000.0));
        assert_eq!(features.stage, Some(DevelopmentStage::Launched));
        assert_eq!(
            features.team_roles,
            vec![TeamRole::Technical, TeamRole::Business, TeamRole::Marketing]
        );
    }

    #[test]
    fn test_questionnaire_blank_fields_are_absent() {
        let data = QuestionnaireData {
            project_name: "X".to_string(),
            solution: "   ".to_string(),
            ..Default::default()
        };
        let features = ExtractedFeatures::from_questionnaire(&data);
        assert!(!features.has_product_description);
        assert!(!features.has_team_info);
        assert_eq!(features.team_size, 0);
        assert_eq!(features.stage, None);
        assert_eq!(features.stage_or_idea(), DevelopmentStage::Idea);
    }

    #[test]
    fn test_questionnaire_negative_ip_answer() {
        let data = QuestionnaireData {
            intellectual_property: "Nessuna".to_string(),
            ..Default::default()
        };
        assert!(!ExtractedFeatures::from_questionnaire(&data).has_intellectual_property);

        let data = QuestionnaireData {
            intellectual_property: "Brevetto depositato".to_string(),
            ..Default::default()
        };
        assert!(ExtractedFeatures::from_questionnaire(&data).has_intellectual_property);
    }
}
