use super::classifier::StatusClassifier;
use super::domain::{OptionalColumn, Snapshot, SnapshotError, STATUS_COLUMN};
use super::ingest::normalize_status;
use serde::{Deserialize, Serialize};

/// Which statuses a single-file extract keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractScope {
    /// Status equals "active" after trimming and lower-casing.
    #[default]
    ActiveOnly,
    /// Status is accepted by the configured classifier.
    ActiveFamily,
}

/// Rows kept from a single upload, every input column untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveExtract {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ActiveExtract {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    EmptyResult,
    Extracted(ActiveExtract),
}

/// Only `Status` is required; a `Hiring Manager` column is appended when absent.
pub fn extract_active(
    snapshot: &Snapshot,
    scope: ExtractScope,
    classifier: &StatusClassifier,
) -> Result<ExtractOutcome, SnapshotError> {
    let status_index = snapshot.require_column(STATUS_COLUMN)?;
    let keep = |status: &str| match scope {
        ExtractScope::ActiveOnly => normalize_status(status) == "active",
        ExtractScope::ActiveFamily => classifier.is_active_family(&normalize_status(status)),
    };

    let mut rows: Vec<Vec<String>> = snapshot
        .rows()
        .iter()
        .filter(|row| keep(&row[status_index]))
        .cloned()
        .collect();

    if rows.is_empty() {
        return Ok(ExtractOutcome::EmptyResult);
    }

    let mut columns = snapshot.columns().to_vec();
    let manager = OptionalColumn::HiringManager;
    if snapshot.column_index(manager.header()).is_none() {
        columns.push(manager.header().to_string());
        for row in &mut rows {
            row.push(manager.default_value().to_string());
        }
    }

    Ok(ExtractOutcome::Extracted(ActiveExtract { columns, rows }))
}
