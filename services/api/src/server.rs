use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_requisition_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reqtrack::config::AppConfig;
use reqtrack::error::AppError;
use reqtrack::telemetry;
use reqtrack::workflows::requisitions::RequisitionTracker;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        export_format: config.tracker.export_format,
    };

    let tracker = Arc::new(RequisitionTracker::from_config(&config.tracker));

    let app = with_requisition_routes(tracker.clone())
        .layer(Extension(app_state))
        .layer(Extension(tracker))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        status_match = %config.tracker.status_match,
        "requisition tracker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
