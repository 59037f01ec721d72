use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::db::{self, DocStore};
use crate::models::{HealthResponse, ReadyResponse};
use crate::state::AppState;

const READY_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint, probes the document store
pub async fn ready_check(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadyResponse>) {
    debug!("Readiness check requested");
    let probe = db::with_timeout(READY_PROBE_TIMEOUT, app_state.store.get("")).await;
    match probe {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ok".to_string(),
                store: app_state.store_backend.to_string(),
            }),
        ),
        Err(e) => {
            error!("Readiness probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: "unavailable".to_string(),
                    store: app_state.store_backend.to_string(),
                }),
            )
        }
    }
}
