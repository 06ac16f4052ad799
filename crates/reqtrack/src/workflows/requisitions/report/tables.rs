use super::export::{ExportKind, ExportTable};
use crate::workflows::requisitions::classifier::canonicalize;
use crate::workflows::requisitions::domain::Source;
use crate::workflows::requisitions::extract::ActiveExtract;
use crate::workflows::requisitions::ingest::NormalizedSnapshot;
use crate::workflows::requisitions::managers::{FilteredView, RecordFilter};
use crate::workflows::requisitions::reconcile::{
    PivotOutcome, PivotRecord, ReconciledRecord, Reconciliation,
};

pub const RECORD_HEADERS: [&str; 8] = [
    "Source",
    "Request ID",
    "Status",
    "Hiring Manager",
    "Job Title",
    "Interviewed?",
    "Work Site Name",
    "Total Positions",
];

pub const PIVOT_HEADERS: [&str; 6] = [
    "Request ID",
    "Status (OLD)",
    "Status (NEW)",
    "Hiring Manager (OLD)",
    "Hiring Manager (NEW)",
    "Status Changed?",
];

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn record_row(record: &ReconciledRecord) -> Vec<String> {
    vec![
        record.source.label().to_string(),
        record.request_id.clone(),
        record.status.clone(),
        record.hiring_manager.clone(),
        record.job_title.clone(),
        record.interviewed.clone(),
        record.work_site_name.clone(),
        record.total_positions.clone(),
    ]
}

fn pivot_row(row: &PivotRecord) -> Vec<String> {
    let cell = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        row.request_id.clone(),
        cell(&row.status_old),
        cell(&row.status_new),
        cell(&row.hiring_manager_old),
        cell(&row.hiring_manager_new),
        if row.status_changed { "Yes" } else { "No" }.to_string(),
    ]
}

pub fn extract_table(extract: &ActiveExtract) -> ExportTable {
    ExportTable::new(
        ExportKind::ActiveExtract,
        extract.columns.clone(),
        extract.rows.clone(),
    )
}

pub fn combined_table(records: &[ReconciledRecord]) -> ExportTable {
    ExportTable::new(
        ExportKind::Combined,
        headers(&RECORD_HEADERS),
        records.iter().map(record_row).collect(),
    )
}

/// Every input column of one side's active rows, status in display form.
pub fn source_table(source: Source, active: &NormalizedSnapshot) -> ExportTable {
    let kind = match source {
        Source::Old => ExportKind::OldOnly,
        Source::New => ExportKind::NewOnly,
    };
    let status_index = active.status_index();
    let rows = active
        .rows()
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            cells[status_index] = canonicalize(&row.status);
            cells
        })
        .collect();

    ExportTable::new(kind, active.columns().to_vec(), rows)
}

pub fn pivot_table(rows: &[PivotRecord]) -> ExportTable {
    ExportTable::new(
        ExportKind::Comparison,
        headers(&PIVOT_HEADERS),
        rows.iter().map(pivot_row).collect(),
    )
}

pub fn filtered_table(view: &FilteredView, filter: &RecordFilter) -> ExportTable {
    let stem = format!(
        "{}_{}",
        ExportKind::Filtered.file_stem(),
        filter.manager.slug()
    );
    ExportTable::new(
        ExportKind::Filtered,
        headers(&RECORD_HEADERS),
        view.records.iter().map(record_row).collect(),
    )
    .with_file_stem(stem)
}

/// Every comparison export that has data; empty sides and a missing pivot are skipped.
pub fn comparison_tables(
    reconciliation: &Reconciliation,
    filtered: &FilteredView,
    filter: &RecordFilter,
) -> Vec<ExportTable> {
    let mut tables = vec![combined_table(reconciliation.unioned())];

    for source in Source::ordered() {
        let active = reconciliation.active(source);
        if !active.is_empty() {
            tables.push(source_table(source, active));
        }
    }

    if let PivotOutcome::Available { rows } = reconciliation.pivot() {
        if !rows.is_empty() {
            tables.push(pivot_table(rows));
        }
    }

    if !filtered.records.is_empty() {
        tables.push(filtered_table(filtered, filter));
    }

    tables
}
