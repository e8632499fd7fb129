//! Approval backend
//!
//! `ApprovalBackend` is the seam between the UI and whatever holds the work
//! items. `JsonFileBackend` keeps everything in one JSON document so the
//! app can run against a local file.

use super::error::RemoteFault;
use crate::model::item::ApprovalItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// One page of fetched work items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPage {
    pub records: Vec<ApprovalItem>,
}

/// Org-level behavior switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSettings {
    #[serde(default)]
    pub disable_bulk_approve_and_reject: bool,
    #[serde(default)]
    pub require_comments: bool,
}

/// Remote operations on approval work items
pub trait ApprovalBackend: Send + Sync {
    fn fetch_items(&self, limit: usize, offset: usize) -> Result<FetchPage, RemoteFault>;

    /// Give the current user access to the record behind a delegated item
    fn share_target_with_me(&self, work_item_id: &str) -> Result<(), RemoteFault>;

    fn submit_decision(
        &self,
        work_item_ids: &[String],
        approve: bool,
        comments: &str,
    ) -> Result<(), RemoteFault>;

    fn lookup_settings(&self) -> Result<ApprovalSettings, RemoteFault>;
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file backend
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("Failed to {operation} data file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file is not valid JSON: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<DataFileError> for RemoteFault {
    fn from(err: DataFileError) -> Self {
        let status_text = match &err {
            DataFileError::Io { .. } => "I/O Error",
            DataFileError::Parse { .. } => "Bad Data",
        };
        RemoteFault {
            body: None,
            message: format!("{}: {}", err, source_message(&err)),
            status_text: status_text.to_string(),
        }
    }
}

fn source_message(err: &DataFileError) -> String {
    match err {
        DataFileError::Io { source, .. } => source.to_string(),
        DataFileError::Parse { source, .. } => source.to_string(),
    }
}

/// A recorded approve/reject call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub work_item_ids: Vec<String>,
    pub approve: bool,
    pub comments: String,
    pub decided_at: DateTime<Utc>,
}

/// On-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    #[serde(default)]
    pub records: Vec<ApprovalItem>,
    #[serde(default)]
    pub settings: ApprovalSettings,
    #[serde(default)]
    pub shared: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<DecisionRecord>,
}

pub struct JsonFileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles from worker threads
    lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Read the document; a missing file is an empty document
    pub fn read(&self) -> Result<DataFile, DataFileError> {
        if !self.path.exists() {
            return Ok(DataFile::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| DataFileError::Io {
            operation: "read",
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| DataFileError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn write(&self, data: &DataFile) -> Result<(), DataFileError> {
        let contents = serde_json::to_string_pretty(data).map_err(|source| DataFileError::Parse {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, contents).map_err(|source| DataFileError::Io {
            operation: "write",
            path: self.path.clone(),
            source,
        })
    }

    fn modify<F>(&self, f: F) -> Result<(), RemoteFault>
    where
        F: FnOnce(&mut DataFile) -> Result<(), RemoteFault>,
    {
        // Poisoning is ignored, the file is re-read on every call
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut data = self.read()?;
        f(&mut data)?;
        self.write(&data)?;
        Ok(())
    }
}

impl ApprovalBackend for JsonFileBackend {
    fn fetch_items(&self, limit: usize, offset: usize) -> Result<FetchPage, RemoteFault> {
        let data = self.read()?;
        let records: Vec<ApprovalItem> = data.records.into_iter().skip(offset).take(limit).collect();
        tracing::debug!(count = records.len(), limit, offset, "fetched work items");
        Ok(FetchPage { records })
    }

    fn share_target_with_me(&self, work_item_id: &str) -> Result<(), RemoteFault> {
        self.modify(|data| {
            if !data.records.iter().any(|r| r.work_item_id == work_item_id) {
                return Err(RemoteFault::from_field_errors([format!(
                    "Work item not found: {}",
                    work_item_id
                )]));
            }
            if !data.shared.iter().any(|id| id == work_item_id) {
                data.shared.push(work_item_id.to_string());
            }
            Ok(())
        })
    }

    fn submit_decision(
        &self,
        work_item_ids: &[String],
        approve: bool,
        comments: &str,
    ) -> Result<(), RemoteFault> {
        self.modify(|data| {
            let known: HashSet<&str> = data.records.iter().map(|r| r.work_item_id.as_str()).collect();
            let unknown: Vec<String> = work_item_ids
                .iter()
                .filter(|id| !known.contains(id.as_str()))
                .map(|id| format!("Work item not found: {}", id))
                .collect();
            if !unknown.is_empty() {
                return Err(RemoteFault::from_field_errors(unknown));
            }

            let decided: HashSet<&String> = work_item_ids.iter().collect();
            data.records.retain(|r| !decided.contains(&r.work_item_id));
            data.decisions.push(DecisionRecord {
                work_item_ids: work_item_ids.to_vec(),
                approve,
                comments: comments.to_string(),
                decided_at: Utc::now(),
            });
            Ok(())
        })?;

        tracing::info!(count = work_item_ids.len(), approve, "recorded decision");
        Ok(())
    }

    fn lookup_settings(&self) -> Result<ApprovalSettings, RemoteFault> {
        Ok(self.read()?.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::build_error_message;
    use serde_json::json;

    fn backend_with(value: serde_json::Value) -> (tempfile::TempDir, JsonFileBackend) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("approvals.json");
        fs::write(&path, value.to_string()).unwrap();
        (dir, JsonFileBackend::new(path))
    }

    fn sample() -> serde_json::Value {
        json!({
            "records": [
                {"workItemId": "w1", "sobjectType": "Account", "relatedToName": "Acme"},
                {"workItemId": "w2", "sobjectType": "Case", "isDelegated": true},
                {"workItemId": "w3", "sobjectType": "Opportunity"}
            ],
            "settings": {"requireComments": true}
        })
    }

    #[test]
    fn test_fetch_pages_with_limit_and_offset() {
        let (_dir, backend) = backend_with(sample());

        let page = backend.fetch_items(2, 0).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].related_to_name, "Acme");

        let page = backend.fetch_items(200, 2).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].work_item_id, "w3");
    }

    #[test]
    fn test_demo_data_file_parses() {
        let data: DataFile =
            serde_json::from_str(include_str!("../../demos/approvals.json")).unwrap();
        assert_eq!(data.records.len(), 4);
        assert!(data.settings.require_comments);
        assert_eq!(
            data.records[0].date_submitted,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(data.records[3].date_submitted, None);
    }

    #[test]
    fn test_fetch_keeps_records_with_odd_dates() {
        let (_dir, backend) = backend_with(json!({
            "records": [
                {"workItemId": "w1", "dateSubmitted": "2024-01-02"},
                {"workItemId": "w2", "dateSubmitted": "01/02/2024"}
            ]
        }));

        let page = backend.fetch_items(200, 0).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].formatted_date(), "2024-01-02");
        assert_eq!(page.records[1].date_submitted, None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("none.json"));
        assert!(backend.fetch_items(5, 0).unwrap().records.is_empty());
        assert_eq!(backend.lookup_settings().unwrap(), ApprovalSettings::default());
    }

    #[test]
    fn test_malformed_file_is_a_fault() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{nope").unwrap();
        let backend = JsonFileBackend::new(path);

        let fault = backend.fetch_items(5, 0).unwrap_err();
        assert_eq!(fault.status_text, "Bad Data");
        assert!(build_error_message(&[fault]).starts_with("Data file is not valid JSON"));
    }

    #[test]
    fn test_lookup_settings() {
        let (_dir, backend) = backend_with(sample());
        let settings = backend.lookup_settings().unwrap();
        assert!(settings.require_comments);
        assert!(!settings.disable_bulk_approve_and_reject);
    }

    #[test]
    fn test_submit_removes_items_and_logs_decision() {
        let (_dir, backend) = backend_with(sample());

        backend
            .submit_decision(&["w1".to_string(), "w3".to_string()], false, "no budget")
            .unwrap();

        let data = backend.read().unwrap();
        let remaining: Vec<&str> = data.records.iter().map(|r| r.work_item_id.as_str()).collect();
        assert_eq!(remaining, vec!["w2"]);
        assert_eq!(data.decisions.len(), 1);
        assert!(!data.decisions[0].approve);
        assert_eq!(data.decisions[0].comments, "no budget");
    }

    #[test]
    fn test_submit_with_unknown_id_changes_nothing() {
        let (_dir, backend) = backend_with(sample());

        let fault = backend
            .submit_decision(&["w1".to_string(), "ghost".to_string()], true, "")
            .unwrap_err();

        assert_eq!(build_error_message(&[fault]), "Work item not found: ghost");
        let data = backend.read().unwrap();
        assert_eq!(data.records.len(), 3);
        assert!(data.decisions.is_empty());
    }

    #[test]
    fn test_share_is_deduplicated() {
        let (_dir, backend) = backend_with(sample());

        backend.share_target_with_me("w2").unwrap();
        backend.share_target_with_me("w2").unwrap();
        assert_eq!(backend.read().unwrap().shared, vec!["w2"]);

        assert!(backend.share_target_with_me("ghost").is_err());
    }
}
