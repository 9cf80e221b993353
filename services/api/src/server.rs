use crate::cli::ServeArgs;
use crate::infra::{AppState, Catalog};
use crate::routes::{cors_layer, with_catalog_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_catalog::config::AppConfig;
use estate_catalog::error::AppError;
use estate_catalog::telemetry;
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
    };

    let catalog = Catalog::build(&config.admin, config.site);
    if let Some(path) = config.seed_csv.as_deref() {
        catalog.seed(path)?;
    }

    let app = with_catalog_routes(&catalog)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, site = ?config.site, %addr, "estate catalog ready");

    axum::serve(listener, app).await?;
    Ok(())
}
