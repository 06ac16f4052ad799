//! Requisition snapshot reconciliation.
//!
//! Two exports of the same requisition system (OLD and NEW) are read, reduced
//! to the active family of statuses, and reconciled by `Request ID` into a
//! union, a side-by-side pivot, hiring-manager summaries and filtered views.

pub mod classifier;
pub mod domain;
pub mod extract;
pub mod ingest;
pub mod managers;
pub mod reconcile;
pub mod report;
pub mod router;
pub mod service;

pub use classifier::{canonicalize, is_active_family, StatusClassifier, StatusMatchRule};
pub use domain::{
    status_priority, ActiveStatus, OptionalColumn, OptionalFields, Snapshot, SnapshotError,
    SnapshotRole, Source, REQUEST_ID_COLUMN, STATUS_COLUMN,
};
pub use extract::{extract_active, ActiveExtract, ExtractOutcome, ExtractScope};
pub use ingest::{
    normalize, normalize_request_id, normalize_status, NormalizedRow, NormalizedSnapshot,
    SnapshotFormat, SnapshotReader,
};
pub use managers::{
    filter_records, hiring_managers, source_status_table, status_distribution,
    summarize_managers, FilteredView, HiringManagerSummary, ManagerSelection, RecordFilter,
    SourceSelection, SourceStatusTable, StatusCount,
};
pub use reconcile::{
    compare, compare_request_ids, reconcile, ComparisonOutcome, PivotOutcome, PivotRecord,
    ReconciledRecord, Reconciliation,
};
pub use report::{
    ComparisonReport, ComparisonView, ExportError, ExportFormat, ExportKind, ExportTable,
    ExtractView, ResultState,
};
pub use router::{requisition_router, CompareRequest, ExtractRequest};
pub use service::RequisitionTracker;
