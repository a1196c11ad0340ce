use crate::infra::{deserialize_optional_date, deserialize_optional_range, AppState, ReconcileState};
use attendance_recon::directory::PersonDirectory;
use attendance_recon::error::AppError;
use attendance_recon::ledger::AttendanceStore;
use attendance_recon::reconciliation::{
    DateScope, MinuteRange, OptionsError, ReconciliationRun, RunOptions, RunReport, ShiftWindows,
};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ReconcileRequest {
    /// Raw punch log, one `anyId;registration;deviceCode;date;time` per line.
    pub(crate) log: String,
    /// Morning window override as `"HH:MM-HH:MM"`.
    #[serde(default, deserialize_with = "deserialize_optional_range")]
    pub(crate) morning: Option<MinuteRange>,
    /// Afternoon window override as `"HH:MM-HH:MM"`.
    #[serde(default, deserialize_with = "deserialize_optional_range")]
    pub(crate) afternoon: Option<MinuteRange>,
    /// Global punch filter as `"HH:MM-HH:MM"`.
    #[serde(default, deserialize_with = "deserialize_optional_range")]
    pub(crate) time_filter: Option<MinuteRange>,
    /// Restrict the run to this date (`YYYY-MM-DD`); omitted means all dates
    /// found in the file.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) date: Option<NaiveDate>,
}

impl ReconcileRequest {
    fn options(&self) -> Result<RunOptions, OptionsError> {
        let defaults = ShiftWindows::default();
        let windows = ShiftWindows::new(
            self.morning.unwrap_or(defaults.morning),
            self.afternoon.unwrap_or(defaults.afternoon),
        )?;
        Ok(RunOptions {
            windows,
            time_filter: self.time_filter,
            date_scope: self.date.map(DateScope::Single).unwrap_or_default(),
        })
    }
}

pub(crate) fn with_reconcile_routes<D, S>(state: Arc<ReconcileState<D, S>>) -> Router
where
    D: PersonDirectory + 'static,
    S: AttendanceStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/attendance/reconcile",
            post(reconcile_endpoint::<D, S>),
        )
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn reconcile_endpoint<D, S>(
    State(state): State<Arc<ReconcileState<D, S>>>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<Json<RunReport>, AppError>
where
    D: PersonDirectory + 'static,
    S: AttendanceStore + 'static,
{
    let options = payload.options()?;
    let reader = Cursor::new(payload.log.into_bytes());
    let report =
        ReconciliationRun::from_reader(reader, &state.directory, &state.store, &options)?;

    info!(summary = %report.summary(), "reconciliation run finished");
    Ok(Json(report))
}
