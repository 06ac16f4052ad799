use metrics_exporter_prometheus::PrometheusHandle;
use reqtrack::workflows::requisitions::{ExportFormat, SourceSelection, StatusMatchRule};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) export_format: ExportFormat,
}

pub(crate) fn parse_export_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse()
}

pub(crate) fn parse_match_rule(raw: &str) -> Result<StatusMatchRule, String> {
    raw.parse()
}

pub(crate) fn parse_source(raw: &str) -> Result<SourceSelection, String> {
    raw.parse()
}
