//! HTTP tunnel: RPC calls carried over `POST /rpc/{pattern}`.
//!
//! Failures are rendered as the normalized `{message, status}` body with the
//! matching HTTP status.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use catalog_core::{default_trace, RpcError};
use serde_json::Value;

use crate::router::RpcRouter;

pub fn tunnel(router: Arc<RpcRouter>) -> Router {
    Router::new()
        .route("/rpc/{pattern}", post(call))
        .route("/health", get(health))
        .layer(default_trace())
        .with_state(router)
}

async fn call(
    State(router): State<Arc<RpcRouter>>,
    Path(pattern): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, RpcError> {
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RpcError::bad_request(format!("invalid JSON body: {e}")))?
    };
    router
        .dispatch(&pattern, payload)
        .await
        .map(Json)
        .map_err(|raised| RpcError::normalize(&raised))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "UP" }))
}
