use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::SnapshotError;
use super::extract::ExtractScope;
use super::managers::{ManagerSelection, RecordFilter, SourceSelection};
use super::report::{ComparisonView, ExtractView};
use super::service::RequisitionTracker;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub csv: String,
    /// Keep the whole active family instead of exact "active" rows.
    #[serde(default)]
    pub family: bool,
}

impl ExtractRequest {
    pub fn scope(&self) -> ExtractScope {
        if self.family {
            ExtractScope::ActiveFamily
        } else {
            ExtractScope::ActiveOnly
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub old_csv: String,
    pub new_csv: String,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl CompareRequest {
    pub fn filter(&self) -> Result<RecordFilter, String> {
        let source = match self.source.as_deref() {
            Some(value) => value.parse::<SourceSelection>()?,
            None => SourceSelection::Both,
        };
        Ok(RecordFilter {
            manager: ManagerSelection::from_input(self.manager.as_deref()),
            source,
        })
    }
}

/// Router builder exposing the extract and compare endpoints.
pub fn requisition_router(tracker: Arc<RequisitionTracker>) -> Router {
    Router::new()
        .route("/api/v1/requisitions/extract", post(extract_handler))
        .route("/api/v1/requisitions/compare", post(compare_handler))
        .with_state(tracker)
}

pub(crate) async fn extract_handler(
    State(tracker): State<Arc<RequisitionTracker>>,
    axum::Json(request): axum::Json<ExtractRequest>,
) -> Response {
    match tracker.extract_csv(&request.csv, request.scope()) {
        Ok(outcome) => {
            let view = ExtractView::from_outcome(&outcome, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => snapshot_error_response(&error),
    }
}

pub(crate) async fn compare_handler(
    State(tracker): State<Arc<RequisitionTracker>>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response {
    let filter = match request.filter() {
        Ok(filter) => filter,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match tracker.compare_csv(&request.old_csv, &request.new_csv) {
        Ok(outcome) => {
            let view = ComparisonView::from_outcome(&outcome, filter, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => snapshot_error_response(&error),
    }
}

/// Missing required columns are 422; anything else wrong with the upload is 400.
pub fn snapshot_error_response(error: &SnapshotError) -> Response {
    let status = if error.is_missing_column() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_REQUEST
    };
    error_response(status, error.to_string())
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (status, axum::Json(payload)).into_response()
}
