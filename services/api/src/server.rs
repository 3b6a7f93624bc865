use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAlertPublisher, InMemoryCandidacyRepository};
use crate::routes::with_match_routes;
use adoption_match::config::AppConfig;
use adoption_match::error::AppError;
use adoption_match::matching::AdoptionMatchService;
use adoption_match::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCandidacyRepository::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let match_service = Arc::new(AdoptionMatchService::new(
        repository,
        alerts,
        config.matching.weights,
    ));

    let app = with_match_routes(match_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "adoption match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
