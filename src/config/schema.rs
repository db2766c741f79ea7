use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::EngineConfig;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Overrides for the analysis constants
    #[serde(default)]
    pub engine: Option<EngineConfig>,

    /// Where saved analyses live (defaults to ~/.config/upstarter/analyses.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}
