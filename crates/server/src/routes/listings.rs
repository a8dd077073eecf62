//! Listing handlers.
//!
//! List, detail and trending are public; every mutation requires a bearer
//! credential. The detail handler is the only read that counts a view.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use hearth_core::{ListingId, UserId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Listing;
use crate::services::ListingService;
use crate::services::listings::{CreateListing, FavoriteToggle, ListingPatch};
use crate::state::AppState;

/// Build the listings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/trending", get(trending))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/rating", patch(rate))
        .route("/{id}/favorite-toggle", post(favorite_toggle))
}

/// Listing list filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// Restrict to listings owned by this user.
    #[serde(default)]
    pub owner: Option<UserId>,
}

/// Rating request body.
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub value: f64,
}

/// All listings, optionally filtered by owner.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<Listing>>> {
    let listings = ListingService::new(state.store()).list(query.owner).await?;
    Ok(Json(listings))
}

/// The most viewed listings.
///
/// # Errors
///
/// `Store` on backend failure.
pub async fn trending(State(state): State<AppState>) -> Result<Json<Vec<Listing>>> {
    let listings = ListingService::new(state.store()).trending().await?;
    Ok(Json(listings))
}

/// Listing detail. Counts a view.
///
/// # Errors
///
/// `NotFound` if the listing does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<Json<Listing>> {
    let listing = ListingService::new(state.store()).get(id).await?;
    Ok(Json(listing))
}

/// Create a listing owned by the caller.
///
/// # Errors
///
/// `Validation` for a missing title, non-positive price or empty image list.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(body): Json<CreateListing>,
) -> Result<(StatusCode, Json<Listing>)> {
    let listing = ListingService::new(state.store()).create(caller, body).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Update a listing. Owner or admin only.
///
/// # Errors
///
/// `NotFound`, `Forbidden` or `Validation` per the service rules.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    caller: CurrentUser,
    Json(body): Json<ListingPatch>,
) -> Result<Json<Listing>> {
    let listing = ListingService::new(state.store())
        .update(id, caller, body)
        .await?;
    Ok(Json(listing))
}

/// Delete a listing. Owner or admin only.
///
/// # Errors
///
/// `NotFound` / `Forbidden` per the service rules.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    caller: CurrentUser,
) -> Result<StatusCode> {
    ListingService::new(state.store()).delete(id, caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upsert the caller's rating.
///
/// # Errors
///
/// `Validation` outside [0, 5], `NotFound` if the listing is missing.
pub async fn rate(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    caller: CurrentUser,
    Json(body): Json<RatingRequest>,
) -> Result<Json<Listing>> {
    let listing = ListingService::new(state.store())
        .set_rating(id, caller, body.value)
        .await?;
    Ok(Json(listing))
}

/// Toggle the caller's favorite flag.
///
/// # Errors
///
/// `NotFound` if the listing is missing.
pub async fn favorite_toggle(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    caller: CurrentUser,
) -> Result<Json<FavoriteToggle>> {
    let toggle = ListingService::new(state.store())
        .toggle_favorite(id, caller)
        .await?;
    Ok(Json(toggle))
}
