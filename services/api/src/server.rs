use crate::cli::ServeArgs;
use crate::infra::{build_review_service, AppState};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use review_insights::config::AppConfig;
use review_insights::error::AppError;
use review_insights::reviews::SystemClock;
use review_insights::telemetry;
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
    if let Some(data) = args.data.take() {
        config.data.reviews_path = data;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let review_service = Arc::new(build_review_service(
        &config.data.reviews_path,
        SystemClock,
    )?);

    let app = with_review_routes(review_service, &config.server.cors_origins)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reviews_path = %config.data.reviews_path.display(),
        cors_origins = ?config.server.cors_origins,
        "guest review insights ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
