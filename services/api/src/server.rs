use crate::cli::ServeArgs;
use crate::infra::{self, AppState, ReconcileState};
use crate::routes::with_reconcile_routes;
use attendance_recon::config::AppConfig;
use attendance_recon::directory::InMemoryPersonDirectory;
use attendance_recon::error::AppError;
use attendance_recon::ledger::InMemoryAttendanceStore;
use attendance_recon::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let directory = InMemoryPersonDirectory::default();
    if let Some(path) = args.people.take() {
        let people = infra::load_people(&path)?;
        info!(count = people.len(), "person directory snapshot loaded");
        for person in people {
            directory.insert(person);
        }
    }

    let store = InMemoryAttendanceStore::default();
    if let Some(path) = args.ledger.take() {
        let seeded = infra::load_ledger(&path, &store)?;
        info!(count = seeded, "existing ledger rows loaded");
    }

    let state = Arc::new(ReconcileState { directory, store });
    let app = with_reconcile_routes(state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "attendance reconciliation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
