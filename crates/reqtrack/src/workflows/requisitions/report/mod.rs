pub mod export;
mod tables;
pub mod views;

pub use export::{ExportError, ExportFormat, ExportKind, ExportTable};
pub use tables::{
    combined_table, comparison_tables, extract_table, filtered_table, pivot_table, source_table,
    PIVOT_HEADERS, RECORD_HEADERS,
};
pub use views::{
    ComparisonReport, ComparisonView, ExtractView, ResultState, SideSummary,
    EMPTY_COMPARISON_MESSAGE, EMPTY_EXTRACT_MESSAGE,
};
