//! Authentication extractors.
//!
//! Handlers declare their authentication requirement through an extractor:
//! [`CurrentUser`] for any valid bearer credential, [`RequireAgent`] where
//! the pipeline routes demand an agent or admin role. Claims come from the
//! signed token; the store is not consulted.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use hearth_core::{Role, UserId};

use crate::error::AppError;
use crate::services::auth::decode_token;
use crate::state::AppState;

/// The authenticated caller, as carried by the bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>, caller: CurrentUser) { .. }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = decode_token(state.config().jwt_secret_bytes(), token)
            .map_err(|_| AppError::Unauthorized("invalid or expired credential"))?;

        Ok(Self {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Extractor that additionally requires an agent or admin role.
///
/// The appointment and client routers are agent-facing; plain users get
/// 403 regardless of the resource.
#[derive(Debug, Clone, Copy)]
pub struct RequireAgent(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAgent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_agent_or_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("malformed authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized("expected a bearer credential"))
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/listings");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(matches!(
            bearer_token(&parts_with(None)),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        assert!(matches!(
            bearer_token(&parts_with(Some("Basic dXNlcjpwdw=="))),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).expect("token"), "abc.def.ghi");
    }
}
