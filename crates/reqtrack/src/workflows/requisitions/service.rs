use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::classifier::{StatusClassifier, StatusMatchRule};
use super::domain::{Snapshot, SnapshotError, SnapshotRole, Source};
use super::extract::{extract_active, ExtractOutcome, ExtractScope};
use super::ingest::SnapshotReader;
use super::managers::{filter_records, RecordFilter};
use super::reconcile::{compare, ComparisonOutcome, PivotOutcome};
use super::report::{
    combined_table, comparison_tables, extract_table, filtered_table, pivot_table, source_table,
    ExportError, ExportFormat, ExportKind, ExportTable,
};
use crate::config::TrackerConfig;

/// Entry point shared by the CLI and the HTTP router. Holds no per-run state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequisitionTracker {
    classifier: StatusClassifier,
}

impl RequisitionTracker {
    pub fn new(rule: StatusMatchRule) -> Self {
        Self {
            classifier: StatusClassifier::new(rule),
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.status_match)
    }

    pub fn extract(
        &self,
        snapshot: &Snapshot,
        scope: ExtractScope,
    ) -> Result<ExtractOutcome, SnapshotError> {
        let outcome = extract_active(snapshot, scope, &self.classifier)?;
        match &outcome {
            ExtractOutcome::Extracted(extract) => info!(
                rows = snapshot.len(),
                kept = extract.len(),
                ?scope,
                "active extract finished"
            ),
            ExtractOutcome::EmptyResult => warn!(rows = snapshot.len(), ?scope, "no active rows"),
        }
        Ok(outcome)
    }

    pub fn extract_csv(
        &self,
        csv: &str,
        scope: ExtractScope,
    ) -> Result<ExtractOutcome, SnapshotError> {
        let snapshot = SnapshotReader::from_csv(csv.as_bytes(), SnapshotRole::Single)?;
        self.extract(&snapshot, scope)
    }

    pub fn compare(
        &self,
        old: &Snapshot,
        new: &Snapshot,
    ) -> Result<ComparisonOutcome, SnapshotError> {
        let outcome = compare(old, new, &self.classifier)?;
        match &outcome {
            ComparisonOutcome::Reconciled(reconciliation) => info!(
                rule = %self.classifier.rule(),
                old_rows = old.len(),
                new_rows = new.len(),
                old_active = reconciliation.active(Source::Old).len(),
                new_active = reconciliation.active(Source::New).len(),
                changed = reconciliation.pivot().changed_count(),
                "comparison finished"
            ),
            ComparisonOutcome::EmptyResult => warn!(
                rule = %self.classifier.rule(),
                old_rows = old.len(),
                new_rows = new.len(),
                "no active status records in either snapshot"
            ),
        }
        Ok(outcome)
    }

    pub fn compare_csv(
        &self,
        old_csv: &str,
        new_csv: &str,
    ) -> Result<ComparisonOutcome, SnapshotError> {
        let old = SnapshotReader::from_csv(old_csv.as_bytes(), SnapshotRole::Old)?;
        let new = SnapshotReader::from_csv(new_csv.as_bytes(), SnapshotRole::New)?;
        self.compare(&old, &new)
    }

    /// Build a single export from a comparison, or `None` when that table has no rows.
    pub fn comparison_export(
        &self,
        outcome: &ComparisonOutcome,
        filter: &RecordFilter,
        kind: ExportKind,
    ) -> Option<ExportTable> {
        let reconciliation = outcome.reconciliation()?;
        let table = match kind {
            ExportKind::Combined => combined_table(reconciliation.unioned()),
            ExportKind::OldOnly => source_table(Source::Old, reconciliation.active(Source::Old)),
            ExportKind::NewOnly => source_table(Source::New, reconciliation.active(Source::New)),
            ExportKind::Comparison => match reconciliation.pivot() {
                PivotOutcome::Available { rows } => pivot_table(rows),
                PivotOutcome::NoCrossSourceData { .. } => return None,
            },
            ExportKind::Filtered => {
                let view = filter_records(reconciliation.unioned(), filter);
                filtered_table(&view, filter)
            }
            ExportKind::ActiveExtract => return None,
        };
        (!table.rows.is_empty()).then_some(table)
    }

    pub fn write_extract(
        &self,
        outcome: &ExtractOutcome,
        dir: &Path,
        format: ExportFormat,
    ) -> Result<Option<PathBuf>, ExportError> {
        match outcome {
            ExtractOutcome::Extracted(extract) => {
                extract_table(extract).write_to_dir(dir, format).map(Some)
            }
            ExtractOutcome::EmptyResult => Ok(None),
        }
    }

    /// Write every comparison export that has data; returns the paths written.
    pub fn write_comparison(
        &self,
        outcome: &ComparisonOutcome,
        filter: &RecordFilter,
        dir: &Path,
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let Some(reconciliation) = outcome.reconciliation() else {
            return Ok(Vec::new());
        };
        let filtered = filter_records(reconciliation.unioned(), filter);
        comparison_tables(reconciliation, &filtered, filter)
            .iter()
            .map(|table| table.write_to_dir(dir, format))
            .collect()
    }
}
