use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCheckRepository};
use crate::routes::with_check_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_affordability::config::AppConfig;
use tenant_affordability::error::AppError;
use tenant_affordability::telemetry;
use tenant_affordability::workflows::affordability::AffordabilityEngine;
use tenant_affordability::workflows::checks::AffordabilityCheckService;
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

    let engine = Arc::new(AffordabilityEngine::new(config.scoring.clone()));
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: engine.clone(),
    };

    let repository = Arc::new(InMemoryCheckRepository::default());
    let check_service = Arc::new(AffordabilityCheckService::new(repository, engine));

    let app = with_check_routes(check_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tenant affordability service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
