pub mod config;
pub mod engine;
pub mod features;
pub mod input;
pub mod narrative;
pub mod parse;
pub mod sections;
pub mod validation;
pub mod valuation;

pub use config::*;
pub use engine::{AnalysisResult, StartupAnalyzer};
pub use features::{ExtractedFeatures, TeamRole};
pub use input::{AnalysisInput, DocumentInput, InputMode, QuestionnaireData};
pub use narrative::{MissingArea, NextSteps};
pub use parse::DevelopmentStage;
pub use validation::validate_engine;
pub use valuation::{format_eur, RiskLevel, ValuationRange};
