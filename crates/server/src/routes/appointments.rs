//! Appointment handlers. Agent/admin only.
//!
//! `markAllSeen` is registered before the parameterized routes so it is
//! never captured as an `{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use hearth_core::{AppointmentId, RequestStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAgent;
use crate::models::AppointmentView;
use crate::services::AppointmentService;
use crate::services::appointments::{
    AppointmentFeed, AppointmentPatch, CreateAppointment, StatusChange,
};
use crate::state::AppState;

/// Build the appointments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/markAllSeen", post(mark_all_seen))
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/status", patch(set_status))
        .route("/{id}/notify-lister", post(notify_lister))
}

/// Status change request body.
///
/// The status arrives as a plain string so an unknown value reports as a
/// 400 with the regular error body rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Acknowledgement summary.
#[derive(Debug, Serialize)]
pub struct SeenResponse {
    pub updated: u64,
}

/// The caller's appointments, split into outgoing and incoming.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn index(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<AppointmentFeed>> {
    let feed = AppointmentService::new(state.store())
        .list_for_user(caller)
        .await?;
    Ok(Json(feed))
}

/// Appointment detail. Participants only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<AppointmentView>> {
    let view = AppointmentService::new(state.store()).get(id, caller).await?;
    Ok(Json(view))
}

/// Book a viewing.
///
/// # Errors
///
/// `NotFound` if the listing does not exist.
pub async fn create(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
    Json(body): Json<CreateAppointment>,
) -> Result<(StatusCode, Json<AppointmentView>)> {
    let view = AppointmentService::new(state.store())
        .create(caller, body)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Reschedule or annotate an appointment. Participants only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
    RequireAgent(caller): RequireAgent,
    Json(body): Json<AppointmentPatch>,
) -> Result<Json<AppointmentView>> {
    let view = AppointmentService::new(state.store())
        .update(id, caller, body)
        .await?;
    Ok(Json(view))
}

/// Delete an appointment. Participants only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
    RequireAgent(caller): RequireAgent,
) -> Result<StatusCode> {
    AppointmentService::new(state.store()).delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the appointment status; confirming synchronizes the pipeline.
///
/// # Errors
///
/// `Validation` for an unknown status name, `NotFound` / `Forbidden` per
/// the service rules.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
    RequireAgent(caller): RequireAgent,
    Json(body): Json<StatusRequest>,
) -> Result<Json<StatusChange>> {
    let status = body
        .status
        .parse::<RequestStatus>()
        .map_err(|err| AppError::Validation(err.to_string()))?;
    let change = AppointmentService::new(state.store())
        .set_status(id, caller, status)
        .await?;
    Ok(Json(change))
}

/// Acknowledge every appointment the caller participates in.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn mark_all_seen(
    State(state): State<AppState>,
    RequireAgent(caller): RequireAgent,
) -> Result<Json<SeenResponse>> {
    let updated = AppointmentService::new(state.store())
        .mark_all_seen(caller)
        .await?;
    Ok(Json(SeenResponse { updated }))
}

/// Notify the listing owner about an appointment.
///
/// # Errors
///
/// `NotFound` when the appointment, listing or owner is missing.
pub async fn notify_lister(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
    RequireAgent(_caller): RequireAgent,
) -> Result<Json<serde_json::Value>> {
    AppointmentService::new(state.store()).notify_lister(id).await?;
    Ok(Json(serde_json::json!({ "msg": "lister notified" })))
}
