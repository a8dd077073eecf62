//! Pipeline client handlers. Agent/admin only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use hearth_core::ClientId;

use crate::error::Result;
use crate::middleware::RequireAgent;
use crate::models::ClientView;
use crate::services::ClientService;
use crate::services::clients::{ClientPatch, CreateClient};
use crate::state::AppState;

/// Build the clients router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/markAllSeen", post(mark_all_seen))
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/confirm", put(confirm))
        .route("/{id}/markSeen", post(mark_seen))
}

/// Acknowledgement summary.
#[derive(Debug, Serialize)]
pub struct SeenResponse {
    pub updated: u64,
}

/// The caller's pipeline.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn index(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<Vec<ClientView>>> {
    let views = ClientService::new(state.store()).list(caller).await?;
    Ok(Json(views))
}

/// Record detail. Owning agent or admin only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<ClientView>> {
    let view = ClientService::new(state.store()).get(id, caller).await?;
    Ok(Json(view))
}

/// Manually add a pipeline entry.
///
/// # Errors
///
/// `Validation` when name or email is empty.
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
    Json(body): Json<CreateClient>,
) -> Result<(StatusCode, Json<ClientView>)> {
    let view = ClientService::new(state.store()).create(caller, body).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Update a record. Owning agent or admin only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    RequireAgent(caller): RequireAgent,
    Json(body): Json<ClientPatch>,
) -> Result<Json<ClientView>> {
    let view = ClientService::new(state.store())
        .update(id, caller, body)
        .await?;
    Ok(Json(view))
}

/// Delete a record. Owning agent or admin only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    RequireAgent(caller): RequireAgent,
) -> Result<StatusCode> {
    ClientService::new(state.store()).delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a record to confirmed. Owning agent or admin only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<ClientView>> {
    let view = ClientService::new(state.store()).confirm(id, caller).await?;
    Ok(Json(view))
}

/// Acknowledge one record for the caller.
///
/// # Errors
///
/// `NotFound` if the record does not exist.
pub async fn mark_seen(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<serde_json::Value>> {
    ClientService::new(state.store()).mark_seen(id, caller).await?;
    Ok(Json(serde_json::json!({ "msg": "client marked as seen" })))
}

/// Acknowledge every record the caller owns.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn mark_all_seen(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<SeenResponse>> {
    let updated = ClientService::new(state.store()).mark_all_seen(caller).await?;
    Ok(Json(SeenResponse { updated }))
}
