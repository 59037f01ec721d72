use crate::{handlers, state::AppState};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/v1/diagnostics", get(handlers::diagnostics))
        .route("/v1/documents/:doc_id", get(handlers::get_document))
}
