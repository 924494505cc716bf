use crate::cli::ServeArgs;
use crate::infra::{seed_demo_catalog, AppState, InMemoryProcurementStore};
use crate::routes::with_procurement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use procura::config::AppConfig;
use procura::error::AppError;
use procura::telemetry;
use procura::workflows::procurement::ProcurementService;
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

    let store = Arc::new(InMemoryProcurementStore::default());
    seed_demo_catalog(&store);
    let procurement_service = Arc::new(ProcurementService::new(store));

    let app = with_procurement_routes(procurement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "procurement recommendation engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
