use super::types::{StoreState, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default store file path (~/.config/upstarter/analyses.json)
pub fn get_store_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("analyses.json"))
}

/// Load the store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_store(path: &Path) -> Result<StoreState> {
    if !path.exists() {
        return Ok(StoreState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open analysis store at {}", path.display()))?;

    let state: StoreState = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse analysis store at {}", path.display()))?;

    if state.version != STORE_VERSION {
        anyhow::bail!("Unsupported analysis store version: {}", state.version);
    }

    Ok(state)
}

/// Save the store to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist.
pub fn save_store(path: &Path, state: &StoreState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize analysis store")?;

    file.commit().context("Failed to save analysis store")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::tests::sample_record;
    use chrono::Utc;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("upstarter_test_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_store(&temp_path).unwrap();
        assert_eq!(state.version, 1);
        assert!(state.analyses.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("upstarter_test_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = StoreState::new();
        let record = sample_record("analysis_1", "GreenBox", Utc::now());
        state.insert(record.clone());

        save_store(&temp_path, &state).unwrap();
        let loaded = load_store(&temp_path).unwrap();

        assert_eq!(loaded.analyses.len(), 1);
        assert_eq!(loaded.get("analysis_1"), Some(&record));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_path = env::temp_dir().join("upstarter_test_version.json");
        std::fs::write(&temp_path, r#"{"version": 7, "analyses": {}}"#).unwrap();

        let err = load_store(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported analysis store version: 7"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let temp_path = env::temp_dir().join("upstarter_test_corrupt.json");
        std::fs::write(&temp_path, "not json").unwrap();

        assert!(load_store(&temp_path).is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
