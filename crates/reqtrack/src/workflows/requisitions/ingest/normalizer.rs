use super::super::classifier::StatusClassifier;
use super::super::domain::{
    OptionalFields, Snapshot, SnapshotError, SnapshotRole, REQUEST_ID_COLUMN, STATUS_COLUMN,
};

/// A row with its identifier and status normalized. `cells` keeps every input
/// column, with the identifier and status cells rewritten to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub request_id: String,
    pub status: String,
    pub optional: OptionalFields,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSnapshot {
    role: SnapshotRole,
    columns: Vec<String>,
    status_index: usize,
    rows: Vec<NormalizedRow>,
}

impl NormalizedSnapshot {
    pub fn role(&self) -> SnapshotRole {
        self.role
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn status_index(&self) -> usize {
        self.status_index
    }

    /// Rows whose status belongs to the active family, in input order.
    pub fn active_rows(&self, classifier: &StatusClassifier) -> NormalizedSnapshot {
        NormalizedSnapshot {
            role: self.role,
            columns: self.columns.clone(),
            status_index: self.status_index,
            rows: self
                .rows
                .iter()
                .filter(|row| classifier.is_active_family(&row.status))
                .cloned()
                .collect(),
        }
    }

    /// Distinct normalized statuses in first-seen order.
    pub fn distinct_statuses(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.status) {
                seen.push(row.status.clone());
            }
        }
        seen
    }
}

/// Fail unless every column in `required` is present.
pub fn validate_columns(
    snapshot: &Snapshot,
    required: &[&'static str],
) -> Result<(), SnapshotError> {
    for &column in required {
        snapshot.require_column(column)?;
    }
    Ok(())
}

pub fn normalize(snapshot: &Snapshot) -> Result<NormalizedSnapshot, SnapshotError> {
    let id_index = snapshot.require_column(REQUEST_ID_COLUMN)?;
    let status_index = snapshot.require_column(STATUS_COLUMN)?;

    let rows = snapshot
        .rows()
        .iter()
        .map(|row| {
            let request_id = normalize_request_id(&row[id_index]);
            let status = normalize_status(&row[status_index]);
            let optional = OptionalFields::resolve(snapshot, row);
            let mut cells = row.clone();
            cells[id_index] = request_id.clone();
            cells[status_index] = status.clone();

            NormalizedRow {
                request_id,
                status,
                optional,
                cells,
            }
        })
        .collect();

    Ok(NormalizedSnapshot {
        role: snapshot.role(),
        columns: snapshot.columns().to_vec(),
        status_index,
        rows,
    })
}

/// `"REQ1001.0 "` becomes `"REQ1001"`; one trailing `.0` is removed.
pub fn normalize_request_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).trim().to_string()
}

pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(columns: &[&str], rows: &[&[&str]]) -> NormalizedSnapshot {
    let snapshot = Snapshot::new(
        SnapshotRole::Old,
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    );
    normalize(&snapshot).expect("fixture normalizes")
}
