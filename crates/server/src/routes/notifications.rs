//! Notification badge handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::NotificationService;
use crate::services::notifications::NotificationCounts;
use crate::state::AppState;

/// Build the notifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/counts", get(counts))
}

/// Current badge counts for the caller.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn counts(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<NotificationCounts>> {
    let counts = NotificationService::new(state.store()).counts(caller).await?;
    Ok(Json(counts))
}
