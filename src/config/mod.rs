mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/upstarter/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("upstarter"))
}

/// Get the default config file path (~/.config/upstarter/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/upstarter/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error: defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

/// Parse configuration from YAML text. An empty document is the default config.
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.engine.is_none());
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
engine:
  weights:
    market: 0.30
    team: 0.15
  scorecard_baseline: 2000000
store_path: /tmp/analyses.json
"#;
        let config = parse_config(yaml).unwrap();
        let engine = config.engine.unwrap();
        assert_eq!(engine.scorecard_baseline, Some(2_000_000.0));
        assert_eq!(engine.effective_weights().market, 0.30);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/analyses.json")));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(parse_config("queries: []").is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let path = env::temp_dir().join("upstarter_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = env::temp_dir().join("upstarter_test_config.yaml");
        fs::write(&path, "engine:\n  valuation_spread: 0.2\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.engine.unwrap().valuation_spread, Some(0.2));

        let _ = fs::remove_file(&path);
    }
}
