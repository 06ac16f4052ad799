use crate::infra::{parse_export_format, parse_match_rule, parse_source};
use chrono::Utc;
use clap::Args;
use reqtrack::config::AppConfig;
use reqtrack::error::AppError;
use reqtrack::telemetry;
use reqtrack::workflows::requisitions::{
    ComparisonReport, ComparisonView, ExportFormat, ExtractOutcome, ExtractScope, ManagerSelection,
    PivotOutcome, RecordFilter, RequisitionTracker, SnapshotReader, SnapshotRole, SourceSelection,
    SourceStatusTable, StatusMatchRule,
};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ExtractArgs {
    /// Requisition export to read (csv, tsv, xlsx, xls, ods)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Directory for the export (defaults to REQTRACK_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Export format, xlsx or csv (defaults to REQTRACK_EXPORT_FORMAT)
    #[arg(long, value_parser = parse_export_format)]
    pub(crate) format: Option<ExportFormat>,
    /// Keep Partially Filled and Zero Filled rows as well as Active ones
    #[arg(long)]
    pub(crate) family: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// Earlier export
    #[arg(long)]
    pub(crate) old: PathBuf,
    /// Later export
    #[arg(long)]
    pub(crate) new: PathBuf,
    /// Directory for the exports (defaults to REQTRACK_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Export format, xlsx or csv (defaults to REQTRACK_EXPORT_FORMAT)
    #[arg(long, value_parser = parse_export_format)]
    pub(crate) format: Option<ExportFormat>,
    /// Restrict the filtered view to one hiring manager
    #[arg(long)]
    pub(crate) manager: Option<String>,
    /// Restrict the filtered view to one file: both, old or new
    #[arg(long, value_parser = parse_source, default_value = "both")]
    pub(crate) source: SourceSelection,
    /// Status matching rule, substring or alias (defaults to REQTRACK_STATUS_MATCH)
    #[arg(long, value_parser = parse_match_rule)]
    pub(crate) match_rule: Option<StatusMatchRule>,
    /// Print the report without writing export files
    #[arg(long)]
    pub(crate) no_export: bool,
}

pub(crate) fn run_extract(args: ExtractArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let tracker = RequisitionTracker::from_config(&config.tracker);
    let scope = if args.family {
        ExtractScope::ActiveFamily
    } else {
        ExtractScope::ActiveOnly
    };

    let snapshot = SnapshotReader::from_path(&args.input, SnapshotRole::Single)?;
    let outcome = tracker.extract(&snapshot, scope)?;

    println!("Active extract: {}", args.input.display());
    println!("Rows read: {}", snapshot.len());

    let ExtractOutcome::Extracted(extract) = &outcome else {
        println!("No Active records found");
        return Ok(());
    };
    println!("Rows kept: {}", extract.len());

    let dir = args.out_dir.unwrap_or(config.tracker.output_dir);
    let format = args.format.unwrap_or(config.tracker.export_format);
    if let Some(path) = tracker.write_extract(&outcome, &dir, format)? {
        println!("Export written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(rule) = args.match_rule {
        config.tracker.status_match = rule;
    }
    telemetry::init(&config.telemetry)?;

    let tracker = RequisitionTracker::from_config(&config.tracker);
    let old = SnapshotReader::from_path(&args.old, SnapshotRole::Old)?;
    let new = SnapshotReader::from_path(&args.new, SnapshotRole::New)?;
    let outcome = tracker.compare(&old, &new)?;

    let filter = RecordFilter {
        manager: ManagerSelection::from_input(args.manager.as_deref()),
        source: args.source,
    };
    let view = ComparisonView::from_outcome(&outcome, filter.clone(), Utc::now());

    println!("Requisition comparison (status match: {})", config.tracker.status_match);
    println!("OLD file: {} ({} rows)", args.old.display(), old.len());
    println!("NEW file: {} ({} rows)", args.new.display(), new.len());

    let Some(report) = &view.report else {
        println!("{}", view.message.as_deref().unwrap_or_default());
        return Ok(());
    };
    render_comparison(report);

    if args.no_export {
        return Ok(());
    }
    let dir = args.out_dir.unwrap_or(config.tracker.output_dir);
    let format = args.format.unwrap_or(config.tracker.export_format);
    let written = tracker.write_comparison(&outcome, &filter, &dir, format)?;
    render_exports(&dir, &written);
    Ok(())
}

pub(crate) fn render_comparison(report: &ComparisonReport) {
    for side in [&report.old, &report.new] {
        println!(
            "{} active-family rows: {} (statuses: {})",
            side.source.label(),
            side.active_count,
            if side.statuses.is_empty() {
                "none".to_string()
            } else {
                side.statuses.join(", ")
            }
        );
    }
    println!("Combined records: {}", report.unioned.len());

    match &report.pivot {
        PivotOutcome::Available { rows } => {
            println!(
                "\nStatus comparison: {} requests, {} changed",
                rows.len(),
                report.changed_count
            );
            for row in rows.iter().filter(|row| row.status_changed) {
                println!(
                    "- {}: {} -> {}",
                    row.request_id,
                    row.status_old.as_deref().unwrap_or("-"),
                    row.status_new.as_deref().unwrap_or("-")
                );
            }
        }
        PivotOutcome::NoCrossSourceData { missing } => {
            println!(
                "\nStatus comparison: skipped, the {} file has no active-family rows",
                missing.label()
            );
        }
    }

    if report.manager_summary.is_empty() {
        println!("\nHiring managers: none recorded");
    } else {
        println!("\nHiring managers");
        for summary in &report.manager_summary {
            println!(
                "- {}: OLD {}, NEW {}, total {}",
                summary.hiring_manager,
                summary.old_requests,
                summary.new_requests,
                summary.total_requests
            );
        }
    }

    println!("\nStatus distribution");
    for entry in &report.status_distribution {
        println!("- {}: {}", entry.status, entry.count);
    }

    println!(
        "\nFiltered view ({}, {}): {} records",
        report.filter.manager.label(),
        report.filter.source,
        report.filtered.records.len()
    );
    render_breakdown(&report.filtered.breakdown);
}

fn render_breakdown(table: &SourceStatusTable) {
    for row in &table.rows {
        let cells: Vec<String> = table
            .statuses
            .iter()
            .zip(&row.counts)
            .map(|(status, count)| format!("{status} {count}"))
            .collect();
        println!("- {}: {}", row.source.label(), cells.join(", "));
    }
}

fn render_exports(dir: &Path, written: &[PathBuf]) {
    if written.is_empty() {
        println!("\nExports: nothing to write");
        return;
    }
    println!("\nExports written to {}", dir.display());
    for path in written {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("- {name}");
    }
}
