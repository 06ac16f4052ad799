use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use reqtrack::error::AppError;
use reqtrack::workflows::requisitions::router::error_response;
use reqtrack::workflows::requisitions::{
    requisition_router, CompareRequest, ExportFormat, ExportKind, RequisitionTracker,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(flatten)]
    pub(crate) comparison: CompareRequest,
    pub(crate) kind: ExportKind,
    #[serde(default)]
    pub(crate) format: Option<ExportFormat>,
}

pub(crate) fn with_requisition_routes(tracker: Arc<RequisitionTracker>) -> axum::Router {
    requisition_router(tracker)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/requisitions/export",
            axum::routing::post(export_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Rebuild the comparison and stream one export back as a download.
pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Extension(tracker): Extension<Arc<RequisitionTracker>>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let filter = match payload.comparison.filter() {
        Ok(filter) => filter,
        Err(message) => return Ok(error_response(StatusCode::BAD_REQUEST, message)),
    };
    let format = payload.format.unwrap_or(state.export_format);

    let outcome = tracker.compare_csv(&payload.comparison.old_csv, &payload.comparison.new_csv)?;
    let Some(table) = tracker.comparison_export(&outcome, &filter, payload.kind) else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            format!("no rows for the {} export", payload.kind),
        ));
    };

    let bytes = table.to_bytes(format)?;
    let file_name = table.file_name(format);
    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();
    info!(kind = %payload.kind, %format, rows = table.rows.len(), "export served");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const OLD: &str = "Request ID,Status,Hiring Manager\nR1,Active,MgrA\nR2,Closed,MgrB\n";
    const NEW: &str = "Request ID,Status,Hiring Manager\nR1,Zero Filled,MgrA\nR3,Partially Filled,MgrC\n";

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            export_format: ExportFormat::Csv,
        };
        let tracker = Arc::new(RequisitionTracker::default());
        with_requisition_routes(tracker.clone())
            .layer(Extension(state))
            .layer(Extension(tracker))
    }

    fn export_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/requisitions/export")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let response = app(true)
            .oneshot(export_request(json!({
                "old_csv": OLD,
                "new_csv": NEW,
                "kind": "comparison",
            })))
            .await
            .expect("responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"active_status_comparison.csv\""
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(text.contains("R1,Active,Zero Filled,MgrA,MgrA,Yes"));
    }

    #[tokio::test]
    async fn export_can_return_a_workbook() {
        let response = app(true)
            .oneshot(export_request(json!({
                "old_csv": OLD,
                "new_csv": NEW,
                "kind": "filtered",
                "manager": "MgrC",
                "format": "xlsx",
            })))
            .await
            .expect("responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"filtered_active_statuses_mgrc.xlsx\""
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn export_file_name_is_safe_for_quoted_managers() {
        let response = app(true)
            .oneshot(export_request(json!({
                "old_csv": "Request ID,Status,Hiring Manager\nR1,Active,\"A/B \"\"C\"\"\"\n",
                "new_csv": NEW,
                "kind": "filtered",
                "manager": "A/B \"C\"",
            })))
            .await
            .expect("responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"filtered_active_statuses_a_b__c_.csv\""
        );
    }

    #[tokio::test]
    async fn export_without_cross_source_data_is_not_found() {
        let response = app(true)
            .oneshot(export_request(json!({
                "old_csv": OLD,
                "new_csv": "Request ID,Status\nR9,Closed\n",
                "kind": "comparison",
            })))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_rejects_missing_column() {
        let response = app(true)
            .oneshot(export_request(json!({
                "old_csv": "Status\nActive\n",
                "new_csv": NEW,
                "kind": "combined",
            })))
            .await
            .expect("responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"], "'Request ID' column not found in OLD file");
    }
}
