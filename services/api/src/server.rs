use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_gateway_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use wgai_gateway::config::AppConfig;
use wgai_gateway::error::AppError;
use wgai_gateway::telemetry;
use wgai_gateway::PartnerClient;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let _telemetry = telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let partner = Arc::new(PartnerClient::new(&config.partner)?);
    info!(
        base_url = partner.base_url(),
        timeout_secs = config.partner.timeout.as_secs(),
        "partner client configured"
    );

    let app = with_gateway_routes(partner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "wgai gateway ready");

    axum::serve(listener, app).await?;
    Ok(())
}
