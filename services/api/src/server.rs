use crate::cli::ServeArgs;
use crate::infra::{
    seed_sample_records, AppState, InMemoryMatchLedger, InMemoryNotificationGateway,
    InMemoryRecordStore,
};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reunite::config::AppConfig;
use reunite::error::AppError;
use reunite::telemetry;
use reunite::workflows::matching::MatchingService;
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

    let records = Arc::new(InMemoryRecordStore::default());
    if args.seed_demo {
        seed_sample_records(&records);
        info!("seeded demo record set");
    }
    let ledger = Arc::new(InMemoryMatchLedger::default());
    let notifications = Arc::new(InMemoryNotificationGateway::default());
    let matching_service = Arc::new(MatchingService::new(
        records,
        ledger,
        notifications,
        config.matching.clone(),
    ));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "matching engine service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
