use crate::{db::{self, DocStore}, models::{DocumentResponse, ErrorResponse}, state::AppState};
use axum::{extract::{Path, State}, http::StatusCode, Json};
use std::sync::Arc;
use tracing::error;

/// Fetch the persisted content of a document.
///
/// Reads the store only, so it never creates a document.
pub async fn get_document(
    State(app_state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<(StatusCode, Json<DocumentResponse>), (StatusCode, Json<ErrorResponse>)> {
    let timeout = app_state.config.persist_policy().timeout;
    match db::with_timeout(timeout, app_state.store.get(&doc_id)).await {
        Ok(Some(content)) => Ok((StatusCode::OK, Json(DocumentResponse { id: doc_id, content }))),
        Ok(None) => {
            let status = StatusCode::NOT_FOUND;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: format!("Document '{}' not found", doc_id),
            })))
        }
        Err(e) => {
            error!("Failed to load document '{}': {}", doc_id, e);
            let status = StatusCode::SERVICE_UNAVAILABLE;
            Err((status, Json(ErrorResponse {
                code: status.as_u16(),
                status: status.to_string(),
                error: format!("Failed to load document '{}'", doc_id),
            })))
        }
    }
}
