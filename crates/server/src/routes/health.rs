//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::error::Result;
use crate::state::AppState;

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe; fails when the document store is unreachable.
///
/// # Errors
///
/// `Store` when the backend ping fails.
pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>> {
    state.store().ping().await?;
    Ok(Json(json!({ "status": "ready" })))
}
