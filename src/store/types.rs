use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::AnalysisResult;

pub const STORE_VERSION: u32 = 1;

/// Prefix of every analysis key, followed by a millisecond timestamp
pub const ID_PREFIX: &str = "analysis_";

/// A saved analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredAnalysis {
    pub id: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

impl StoredAnalysis {
    pub fn new(id: String, created_at: DateTime<Utc>, result: AnalysisResult) -> Self {
        Self {
            id,
            project_name: result.project_name.clone(),
            created_at,
            result,
        }
    }
}

/// On-disk layout of the analysis store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub version: u32,
    #[serde(default)]
    pub analyses: BTreeMap<String, StoredAnalysis>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    /// Create a new empty store with the current version
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            analyses: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoredAnalysis> {
        self.analyses.get(id)
    }

    /// Insert or replace a record under its own id, returning the replaced one
    pub fn insert(&mut self, record: StoredAnalysis) -> Option<StoredAnalysis> {
        self.analyses.insert(record.id.clone(), record)
    }

    /// Remove a record, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<StoredAnalysis> {
        self.analyses.remove(id)
    }

    /// All records, newest first (ties broken by id)
    pub fn newest_first(&self) -> Vec<StoredAnalysis> {
        let mut records: Vec<StoredAnalysis> = self.analyses.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        records
    }

    /// Id for a record created at `now`, unique within this store
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("{}{}", ID_PREFIX, millis);
            if !self.analyses.contains_key(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::{QuestionnaireData, StartupAnalyzer};
    use chrono::{Duration, TimeZone};

    pub(crate) fn sample_record(id: &str, name: &str, created_at: DateTime<Utc>) -> StoredAnalysis {
        let data = QuestionnaireData {
            project_name: name.to_string(),
            ..Default::default()
        };
        let result = StartupAnalyzer::default().analyze_from_questionnaire(&data);
        StoredAnalysis::new(id.to_string(), created_at, result)
    }

    #[test]
    fn test_new_store_empty() {
        let state = StoreState::new();
        assert_eq!(state.version, 1);
        assert!(state.analyses.is_empty());
    }

    #[test]
    fn test_record_takes_project_name_from_result() {
        let record = sample_record("analysis_1", "GreenBox", Utc::now());
        assert_eq!(record.project_name, "GreenBox");
    }

    #[test]
    fn test_insert_get_remove() {
        let mut state = StoreState::new();
        state.insert(sample_record("analysis_1", "A", Utc::now()));
        assert!(state.get("analysis_1").is_some());
        assert_eq!(state.remove("analysis_1").map(|r| r.project_name), Some("A".to_string()));
        assert!(state.remove("analysis_1").is_none());
        assert!(state.get("analysis_1").is_none());
    }

    #[test]
    fn test_newest_first() {
        let mut state = StoreState::new();
        let now = Utc::now();
        state.insert(sample_record("analysis_1", "Old", now - Duration::days(2)));
        state.insert(sample_record("analysis_2", "New", now));
        state.insert(sample_record("analysis_3", "Middle", now - Duration::hours(3)));

        let names: Vec<String> = state
            .newest_first()
            .into_iter()
            .map(|r| r.project_name)
            .collect();
        assert_eq!(names, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn test_next_id_uses_millis_and_avoids_collisions() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut state = StoreState::new();
        assert_eq!(state.next_id(now), "analysis_1700000000000");

        state.insert(sample_record("analysis_1700000000000", "A", now));
        assert_eq!(state.next_id(now), "analysis_1700000000001");
    }
}
