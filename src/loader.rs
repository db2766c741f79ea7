use anyhow::{Context, Result};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::analysis::{AnalysisInput, DocumentInput, QuestionnaireData};

/// How the contents of an input file are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
    /// Anything else is a free-text document
    Text,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => InputFormat::Json,
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Text,
        }
    }
}

/// Read an input file and turn it into something the analyzer accepts.
///
/// `title` overrides the document title or the questionnaire's project name.
pub fn load_input(path: &Path, title: Option<&str>) -> Result<AnalysisInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file at {}", path.display()))?;

    let default_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut input = parse_input(&content, InputFormat::from_path(path), default_title)
        .with_context(|| format!("Failed to parse input file at {}", path.display()))?;

    if let Some(title) = title {
        match &mut input {
            AnalysisInput::Document(doc) => doc.title = title.to_string(),
            AnalysisInput::Questionnaire(data) => data.project_name = title.to_string(),
        }
    }
    Ok(input)
}

/// Only the `mode` key of a structured file, to pick how the rest is read
#[derive(Debug, Deserialize)]
struct ModeTag {
    #[serde(default)]
    mode: Option<IgnoredAny>,
}

/// Structured files may carry a `mode` tag; without one they are read as a questionnaire.
///
/// A file that has a `mode` key must parse as that mode; its errors are
/// reported rather than retried as a questionnaire.
pub fn parse_input(content: &str, format: InputFormat, default_title: &str) -> Result<AnalysisInput> {
    match format {
        InputFormat::Text => Ok(AnalysisInput::Document(DocumentInput {
            title: default_title.to_string(),
            content: content.to_string(),
        })),
        InputFormat::Json => {
            let tagged = serde_json::from_str::<ModeTag>(content)
                .map(|t| t.mode.is_some())
                .unwrap_or(true);
            if tagged {
                return serde_json::from_str::<AnalysisInput>(content)
                    .context("Invalid JSON input for its `mode`");
            }
            let data: QuestionnaireData =
                serde_json::from_str(content).context("Invalid questionnaire JSON")?;
            Ok(AnalysisInput::Questionnaire(data))
        }
        InputFormat::Yaml => {
            let tagged = serde_saphyr::from_str::<ModeTag>(content)
                .map(|t| t.mode.is_some())
                .unwrap_or(true);
            if tagged {
                return serde_saphyr::from_str::<AnalysisInput>(content)
                    .context("Invalid YAML input for its `mode`");
            }
            let data: QuestionnaireData =
                serde_saphyr::from_str(content).context("Invalid questionnaire YAML")?;
            Ok(AnalysisInput::Questionnaire(data))
        }
    }
}
