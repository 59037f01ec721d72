//! HTTP API tests run against the router without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use colabri_pad::config::Config;
use colabri_pad::db::{DocStore, MemDocStore};
use colabri_pad::routes::build_router;
use colabri_pad::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(store: Arc<MemDocStore>) -> axum::Router {
    let state = Arc::new(AppState::new(Config::default(), store, "memory"));
    build_router(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get_json(app_with(Arc::new(MemDocStore::new())), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ready_names_the_store_backend() {
    let (status, body) = get_json(app_with(Arc::new(MemDocStore::new())), "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn document_endpoint_returns_persisted_record() {
    let store = Arc::new(MemDocStore::new());
    store.put("abcd1234", "hello").await.unwrap();

    let (status, body) = get_json(app_with(store), "/api/v1/documents/abcd1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "abcd1234");
    assert_eq!(body["content"], "hello");
}

#[tokio::test]
async fn unknown_document_is_not_created_by_lookup() {
    let store = Arc::new(MemDocStore::new());

    let (status, body) = get_json(app_with(store.clone()), "/api/v1/documents/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn diagnostics_start_empty() {
    let (status, body) = get_json(app_with(Arc::new(MemDocStore::new())), "/api/v1/diagnostics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n_conn"], 0);
    assert_eq!(body["n_rooms"], 0);
}
