//! Hearth server library.
//!
//! The REST backend of the Hearth real-estate marketplace: listings,
//! viewing appointments, the agents' sales pipeline and the notification
//! badges gluing them together. Exposed as a library so the router can be
//! exercised in tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().allowed_origins);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Wrap the finished router so `/api/listings/` and `/api/listings` hit the
/// same handler.
///
/// Trailing-slash normalization has to wrap the router from the outside; a
/// layer added via [`Router::layer`] would only run after routing has
/// already missed.
#[must_use]
pub fn normalize_trailing_slash(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// CORS layer from the configured origins; an empty list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;
    use crate::store::MemoryStore;

    fn test_state() -> AppState {
        let vars = HashMap::from([
            ("HEARTH_STORE".to_owned(), "memory".to_owned()),
            (
                "HEARTH_JWT_SECRET".to_owned(),
                "kR8vN2mQ7pX4wL9jF3hT6bY1cD5gA0eZ".to_owned(),
            ),
            (
                "HEARTH_IMAGE_HOST_URL".to_owned(),
                "https://img.test/upload".to_owned(),
            ),
            ("HEARTH_IMAGE_HOST_KEY".to_owned(), "k".to_owned()),
        ]);
        let config = ServerConfig::from_vars(&vars).expect("config");
        AppState::new(config, Arc::new(MemoryStore::new()))
    }

    fn app() -> NormalizePath<Router> {
        normalize_trailing_slash(build_router(test_state()))
    }

    #[tokio::test]
    async fn trailing_slashes_resolve_to_the_same_route() {
        let response = app()
            .oneshot(
                Request::get("/api/listings/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_status_values_report_through_the_error_body() {
        let app = app();

        let register = Request::post("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Greta","email":"greta@hearth.test","password":"long-enough-password","role":"agent"}"#,
            ))
            .expect("request");
        let response = app.clone().oneshot(register).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let session: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let token = session["token"].as_str().expect("token");

        let patch = Request::patch(format!(
            "/api/appointments/{}/status",
            uuid::Uuid::new_v4()
        ))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(r#"{"status":"done"}"#))
        .expect("request");
        let response = app.oneshot(patch).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let error: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(error["error"].as_str().expect("message").contains("done"));
    }
}
