//! Core type definitions.

mod email;
mod id;
mod role;
mod status;

pub use email::{Email, EmailError};
pub use id::{AppointmentId, ClientId, ListingId, UserId};
pub use role::{Role, UnknownRole};
pub use status::{RequestStatus, UnknownStatus};
