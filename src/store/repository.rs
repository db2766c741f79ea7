use anyhow::Result;
use std::path::{Path, PathBuf};

use super::storage::{load_store, save_store};
use super::types::{StoreState, StoredAnalysis};

/// Typed key-value access to saved analyses.
///
/// The analyzer never sees this; callers run it and then decide what to keep.
pub trait AnalysisRepository {
    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>>;

    /// Insert or replace the record stored under `record.id`
    fn set(&mut self, record: StoredAnalysis) -> Result<()>;

    /// Returns true if a record was removed
    fn delete(&mut self, id: &str) -> Result<bool>;

    /// All records, newest first
    fn list(&self) -> Result<Vec<StoredAnalysis>>;

    /// Fresh id for a record created now
    fn next_id(&self) -> String;
}

/// Repository kept in memory only
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: StoreState,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisRepository for MemoryRepository {
    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>> {
        Ok(self.state.get(id).cloned())
    }

    fn set(&mut self, record: StoredAnalysis) -> Result<()> {
        self.state.insert(record);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.state.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<StoredAnalysis>> {
        Ok(self.state.newest_first())
    }

    fn next_id(&self) -> String {
        self.state.next_id(chrono::Utc::now())
    }
}

/// Repository backed by a JSON file; every mutation is written through
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    state: StoreState,
}

impl JsonFileRepository {
    /// Open the store at `path`, starting empty if the file doesn't exist
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            state: load_store(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnalysisRepository for JsonFileRepository {
    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>> {
        Ok(self.state.get(id).cloned())
    }

    fn set(&mut self, record: StoredAnalysis) -> Result<()> {
        let id = record.id.clone();
        let previous = self.state.insert(record);
        if let Err(e) = save_store(&self.path, &self.state) {
            // Memory must keep matching what is on disk
            match previous {
                Some(old) => {
                    self.state.insert(old);
                }
                None => {
                    self.state.remove(&id);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(removed) = self.state.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = save_store(&self.path, &self.state) {
            self.state.insert(removed);
            return Err(e);
        }
        Ok(true)
    }

    fn list(&self) -> Result<Vec<StoredAnalysis>> {
        Ok(self.state.newest_first())
    }

    fn next_id(&self) -> String {
        self.state.next_id(chrono::Utc::now())
    }
}

/// Find a record by id or by its 1-based position in `list()`
pub fn resolve<R: AnalysisRepository + ?Sized>(
    repo: &R,
    key: &str,
) -> Result<Option<StoredAnalysis>> {
    if let Some(record) = repo.get(key)? {
        return Ok(Some(record));
    }
    match key.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(repo.list()?.into_iter().nth(index - 1)),
        _ => Ok(None),
    }
}
