//! Business logic, one service per resource.
//!
//! Services own the authorization rules (owner-or-admin, participant-only)
//! and the cross-entity side effects; handlers stay thin. Each service
//! borrows the document store, so tests construct them directly over a
//! `MemoryStore`.

pub mod appointments;
pub mod auth;
pub mod clients;
pub mod listings;
pub mod notifications;
pub mod uploads;

pub use appointments::AppointmentService;
pub use auth::{AuthError, AuthService};
pub use clients::ClientService;
pub use listings::ListingService;
pub use notifications::NotificationService;
