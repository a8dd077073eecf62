//! Authentication handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use hearth_core::Role;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::{AuthService, Session};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user", get(current_user))
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.store(),
        state.config().jwt_secret_bytes(),
        state.config().token_ttl_hours,
    )
}

/// Register a new account.
///
/// # Errors
///
/// `Validation` for a bad name or an admin role request, `Auth` for an
/// invalid email, weak password or taken email.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Session>)> {
    let session = service(&state)
        .register(&body.name, &body.email, body.phone, &body.password, body.role)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Exchange email and password for a bearer token.
///
/// # Errors
///
/// `Auth(InvalidCredentials)` for an unknown email or wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Session>> {
    let session = service(&state).login(&body.email, &body.password).await?;
    Ok(Json(session))
}

/// The authenticated user's full profile.
///
/// # Errors
///
/// `NotFound` if the account behind the credential has been removed.
pub async fn current_user(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<User>> {
    let user = service(&state).current_user(caller.id).await?;
    Ok(Json(user))
}
