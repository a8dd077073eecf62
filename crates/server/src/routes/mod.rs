//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the store)
//!
//! # Auth
//! POST /api/auth/register      - Register and receive a bearer token
//! POST /api/auth/login         - Login and receive a bearer token
//! GET  /api/auth/user          - Current user's profile
//!
//! # Listings (list/detail/trending are public)
//! GET    /api/listings                     - All listings (?owner= filter)
//! POST   /api/listings                     - Create a listing
//! GET    /api/listings/trending            - Most viewed listings
//! GET    /api/listings/{id}                - Listing detail (counts a view)
//! PUT    /api/listings/{id}                - Update a listing
//! DELETE /api/listings/{id}                - Delete a listing
//! PATCH  /api/listings/{id}/rating         - Rate a listing
//! POST   /api/listings/{id}/favorite-toggle - Toggle favorite
//!
//! # Appointments (agent/admin only)
//! POST   /api/appointments/markAllSeen     - Acknowledge all
//! GET    /api/appointments                 - Outgoing + incoming feed
//! POST   /api/appointments                 - Book a viewing
//! GET    /api/appointments/{id}            - Appointment detail
//! PUT    /api/appointments/{id}            - Reschedule / annotate
//! DELETE /api/appointments/{id}            - Delete
//! PATCH  /api/appointments/{id}/status     - Set status (syncs pipeline)
//! POST   /api/appointments/{id}/notify-lister - Notify the listing owner
//!
//! # Clients (agent/admin only)
//! POST   /api/clients/markAllSeen          - Acknowledge all
//! GET    /api/clients                      - Pipeline (own, or all for admin)
//! POST   /api/clients                      - Add a pipeline entry
//! GET    /api/clients/{id}                 - Record detail
//! PUT    /api/clients/{id}                 - Update a record
//! DELETE /api/clients/{id}                 - Delete a record
//! PUT    /api/clients/{id}/confirm         - Move to confirmed
//! POST   /api/clients/{id}/markSeen        - Acknowledge one record
//!
//! # Notifications
//! GET  /api/notifications/counts           - Badge counts
//!
//! # Upload
//! POST /api/upload                         - Proxy images to the image host
//! ```

pub mod appointments;
pub mod auth;
pub mod clients;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/listings", listings::router())
        .nest("/appointments", appointments::router())
        .nest("/clients", clients::router())
        .nest("/notifications", notifications::router())
        .nest("/upload", upload::router())
}
