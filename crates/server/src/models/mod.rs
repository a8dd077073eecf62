//! Domain models persisted in the document store.
//!
//! Documents reference each other by newtype ID only. Where the API responds
//! with resolved references (a counterpart user on an appointment, a property
//! title on a pipeline client), the projection types in each module carry the
//! inlined summaries; the stored documents stay flat.

pub mod appointment;
pub mod client;
pub mod listing;
pub mod user;

pub use appointment::{Appointment, AppointmentView};
pub use client::{Client, ClientView};
pub use listing::{Listing, ListingSummary, RatingEntry};
pub use user::{User, UserSummary};
