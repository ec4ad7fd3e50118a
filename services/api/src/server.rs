use crate::cli::ServeArgs;
use crate::infra::{build_session, AppState};
use crate::routes::with_pitch_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pitch_score::config::AppConfig;
use pitch_score::error::AppError;
use pitch_score::telemetry;
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

    let session = build_session(&config.scoring)?;
    let backend = session.backend().name();

    let app = with_pitch_routes(session)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, backend, "pitch scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
