use super::classifier::{canonicalize, StatusClassifier};
use super::domain::{
    status_priority, Snapshot, SnapshotError, Source, REQUEST_ID_COLUMN, STATUS_COLUMN,
};
use super::ingest::{normalize, validate_columns, NormalizedRow, NormalizedSnapshot};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One qualifying requisition tagged with the snapshot it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRecord {
    pub source: Source,
    pub request_id: String,
    pub status: String,
    pub hiring_manager: String,
    pub job_title: String,
    pub interviewed: String,
    pub work_site_name: String,
    pub total_positions: String,
}

impl ReconciledRecord {
    pub fn from_row(source: Source, row: &NormalizedRow) -> Self {
        let optional = row.optional.clone();
        Self {
            source,
            request_id: row.request_id.clone(),
            status: canonicalize(&row.status),
            hiring_manager: optional.hiring_manager,
            job_title: optional.job_title,
            interviewed: optional.interviewed,
            work_site_name: optional.work_site_name,
            total_positions: optional.total_positions,
        }
    }

    pub fn priority(&self) -> u8 {
        status_priority(&self.status)
    }
}

/// Numeric identifiers compare by value and sort ahead of non-numeric ones,
/// which compare as plain strings.
pub fn compare_request_ids(left: &str, right: &str) -> Ordering {
    match (numeric_id(left), numeric_id(right)) {
        (Some(l), Some(r)) => l.cmp(&r).then_with(|| left.cmp(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

/// Plain ASCII digits only; `+5` and `-5` compare as strings.
fn numeric_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Stable sort by (status priority, request id).
pub fn order_records(records: &mut [ReconciledRecord]) {
    records.sort_by(|a, b| {
        a.priority()
            .cmp(&b.priority())
            .then_with(|| compare_request_ids(&a.request_id, &b.request_id))
    });
}

/// Side-by-side view of one request id across both snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRecord {
    pub request_id: String,
    pub status_old: Option<String>,
    pub status_new: Option<String>,
    pub hiring_manager_old: Option<String>,
    pub hiring_manager_new: Option<String>,
    /// False whenever either side is missing.
    pub status_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PivotOutcome {
    Available { rows: Vec<PivotRecord> },
    NoCrossSourceData { missing: Source },
}

impl PivotOutcome {
    pub fn rows(&self) -> &[PivotRecord] {
        match self {
            Self::Available { rows } => rows,
            Self::NoCrossSourceData { .. } => &[],
        }
    }

    pub fn changed_count(&self) -> usize {
        self.rows().iter().filter(|row| row.status_changed).count()
    }
}

/// Everything derived from two snapshots that both passed validation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    old_active: NormalizedSnapshot,
    new_active: NormalizedSnapshot,
    unioned: Vec<ReconciledRecord>,
    pivot: PivotOutcome,
}

impl Reconciliation {
    pub fn active(&self, source: Source) -> &NormalizedSnapshot {
        match source {
            Source::Old => &self.old_active,
            Source::New => &self.new_active,
        }
    }

    pub fn unioned(&self) -> &[ReconciledRecord] {
        &self.unioned
    }

    pub fn pivot(&self) -> &PivotOutcome {
        &self.pivot
    }
}

#[derive(Debug, Clone)]
pub enum ComparisonOutcome {
    /// Neither snapshot had a qualifying row.
    EmptyResult,
    Reconciled(Reconciliation),
}

impl ComparisonOutcome {
    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        match self {
            Self::EmptyResult => None,
            Self::Reconciled(reconciliation) => Some(reconciliation),
        }
    }
}

/// Validate both snapshots, normalize, filter to the active family and reconcile.
pub fn compare(
    old: &Snapshot,
    new: &Snapshot,
    classifier: &StatusClassifier,
) -> Result<ComparisonOutcome, SnapshotError> {
    let required = [REQUEST_ID_COLUMN, STATUS_COLUMN];
    validate_columns(old, &required)?;
    validate_columns(new, &required)?;

    let old_active = normalize(old)?.active_rows(classifier);
    let new_active = normalize(new)?.active_rows(classifier);
    Ok(reconcile(old_active, new_active))
}

/// Reconcile two snapshots already filtered to the active family.
pub fn reconcile(old_active: NormalizedSnapshot, new_active: NormalizedSnapshot) -> ComparisonOutcome {
    if old_active.is_empty() && new_active.is_empty() {
        return ComparisonOutcome::EmptyResult;
    }

    let concatenated: Vec<ReconciledRecord> = old_active
        .rows()
        .iter()
        .map(|row| ReconciledRecord::from_row(Source::Old, row))
        .chain(
            new_active
                .rows()
                .iter()
                .map(|row| ReconciledRecord::from_row(Source::New, row)),
        )
        .collect();

    let pivot = if old_active.is_empty() {
        PivotOutcome::NoCrossSourceData {
            missing: Source::Old,
        }
    } else if new_active.is_empty() {
        PivotOutcome::NoCrossSourceData {
            missing: Source::New,
        }
    } else {
        PivotOutcome::Available {
            rows: build_pivot(&concatenated),
        }
    };

    let mut unioned = concatenated;
    order_records(&mut unioned);

    ComparisonOutcome::Reconciled(Reconciliation {
        old_active,
        new_active,
        unioned,
        pivot,
    })
}

#[derive(Default)]
struct PivotSides<'a> {
    old: Option<&'a ReconciledRecord>,
    new: Option<&'a ReconciledRecord>,
}

/// `records` must be in source order so the first occurrence per side wins.
fn build_pivot(records: &[ReconciledRecord]) -> Vec<PivotRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut sides: HashMap<&str, PivotSides<'_>> = HashMap::new();

    for record in records {
        let entry = sides.entry(record.request_id.as_str()).or_insert_with(|| {
            order.push(record.request_id.as_str());
            PivotSides::default()
        });
        let slot = match record.source {
            Source::Old => &mut entry.old,
            Source::New => &mut entry.new,
        };
        if slot.is_none() {
            *slot = Some(record);
        }
    }

    order.sort_by(|a, b| compare_request_ids(a, b));

    order
        .into_iter()
        .filter_map(|request_id| {
            let side = sides.get(request_id)?;
            let status_old = side.old.map(|record| record.status.clone());
            let status_new = side.new.map(|record| record.status.clone());
            let status_changed = match (&status_old, &status_new) {
                (Some(old), Some(new)) => old.to_lowercase() != new.to_lowercase(),
                _ => false,
            };

            Some(PivotRecord {
                request_id: request_id.to_string(),
                hiring_manager_old: side.old.map(|record| record.hiring_manager.clone()),
                hiring_manager_new: side.new.map(|record| record.hiring_manager.clone()),
                status_old,
                status_new,
                status_changed,
            })
        })
        .collect()
}
