use crate::workflows::requisitions::domain::Source;
use crate::workflows::requisitions::extract::ExtractOutcome;
use crate::workflows::requisitions::managers::{
    filter_records, hiring_managers, source_status_table, status_distribution, summarize_managers,
    FilteredView, HiringManagerSummary, RecordFilter, SourceStatusTable, StatusCount,
};
use crate::workflows::requisitions::reconcile::{
    ComparisonOutcome, PivotOutcome, ReconciledRecord, Reconciliation,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const EMPTY_COMPARISON_MESSAGE: &str = "No active status records found in either file";
pub const EMPTY_EXTRACT_MESSAGE: &str = "No Active records found";

#[derive(Debug, Clone, Serialize)]
pub struct SideSummary {
    pub source: Source,
    pub active_count: usize,
    pub statuses: Vec<String>,
}

/// Every derived table of one comparison run, ready for a UI or JSON client.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub old: SideSummary,
    pub new: SideSummary,
    pub unioned: Vec<ReconciledRecord>,
    pub pivot: PivotOutcome,
    pub changed_count: usize,
    pub hiring_managers: Vec<String>,
    pub manager_summary: Vec<HiringManagerSummary>,
    pub status_distribution: Vec<StatusCount>,
    pub source_breakdown: SourceStatusTable,
    pub filter: RecordFilter,
    pub filtered: FilteredView,
}

impl ComparisonReport {
    pub fn build(reconciliation: &Reconciliation, filter: RecordFilter) -> Self {
        let side = |source: Source| {
            let active = reconciliation.active(source);
            SideSummary {
                source,
                active_count: active.len(),
                statuses: active.distinct_statuses(),
            }
        };
        let unioned = reconciliation.unioned();

        Self {
            old: side(Source::Old),
            new: side(Source::New),
            unioned: unioned.to_vec(),
            pivot: reconciliation.pivot().clone(),
            changed_count: reconciliation.pivot().changed_count(),
            hiring_managers: hiring_managers(unioned),
            manager_summary: summarize_managers(unioned),
            status_distribution: status_distribution(unioned),
            source_breakdown: source_status_table(unioned),
            filtered: filter_records(unioned, &filter),
            filter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultState {
    Reconciled,
    Extracted,
    EmptyResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub generated_at: DateTime<Utc>,
    pub state: ResultState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ComparisonReport>,
}

impl ComparisonView {
    pub fn from_outcome(
        outcome: &ComparisonOutcome,
        filter: RecordFilter,
        generated_at: DateTime<Utc>,
    ) -> Self {
        match outcome {
            ComparisonOutcome::EmptyResult => Self {
                generated_at,
                state: ResultState::EmptyResult,
                message: Some(EMPTY_COMPARISON_MESSAGE.to_string()),
                report: None,
            },
            ComparisonOutcome::Reconciled(reconciliation) => Self {
                generated_at,
                state: ResultState::Reconciled,
                message: None,
                report: Some(ComparisonReport::build(reconciliation, filter)),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractView {
    pub generated_at: DateTime<Utc>,
    pub state: ResultState,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExtractView {
    pub fn from_outcome(outcome: &ExtractOutcome, generated_at: DateTime<Utc>) -> Self {
        match outcome {
            ExtractOutcome::EmptyResult => Self {
                generated_at,
                state: ResultState::EmptyResult,
                count: 0,
                message: Some(EMPTY_EXTRACT_MESSAGE.to_string()),
                columns: Vec::new(),
                rows: Vec::new(),
            },
            ExtractOutcome::Extracted(extract) => Self {
                generated_at,
                state: ResultState::Extracted,
                count: extract.len(),
                message: None,
                columns: extract.columns.clone(),
                rows: extract.rows.clone(),
            },
        }
    }
}
