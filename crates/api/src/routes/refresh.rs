//! CSV refresh endpoint — schedules the load as a background task.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{LoadMode, UnknownLoadMode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub csv_path: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "append".to_string()
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub message: String,
}

/// POST /refresh-data — validate, ack immediately, load in the background.
///
/// The caller gets a 202 as soon as the request is validated. The load's
/// outcome (including a missing CSV file) is logged and counted, never
/// reported back on this request.
#[tracing::instrument(skip(state, req))]
pub async fn refresh_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<RefreshResponse>), ApiError> {
    let mode: LoadMode = req
        .mode
        .parse()
        .map_err(|e: UnknownLoadMode| ApiError::BadRequest(e.to_string()))?;
    if req.csv_path.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "missing required field: csv_path".to_string(),
        ));
    }

    let load_id = Uuid::new_v4();
    let loader = state.loader.clone();
    let path = PathBuf::from(req.csv_path);

    metrics::counter!("refresh_jobs_started").increment(1);
    tracing::info!(%load_id, path = %path.display(), %mode, "data refresh initiated");

    tokio::spawn(async move {
        let started = Instant::now();
        match loader.load(&path, mode).await {
            Ok(report) => {
                metrics::counter!("refresh_jobs_completed").increment(1);
                metrics::histogram!("refresh_load_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(%load_id, rows = report.rows_loaded, "data refresh completed");
            }
            Err(e) => {
                metrics::counter!("refresh_jobs_failed").increment(1);
                tracing::error!(%load_id, error = %e, "data refresh failed");
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            message: format!("data refresh initiated (load {load_id})"),
        }),
    ))
}
