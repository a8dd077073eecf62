//! Viewing appointment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hearth_core::{AppointmentId, ListingId, RequestStatus, UserId};

use super::{ListingSummary, UserSummary};

/// A viewing request linking a prospective buyer and a listing owner.
///
/// `recipient` is snapshotted from the listing's owner at creation time and
/// never re-resolved: if the listing later changes hands the reference goes
/// stale, which is the intended behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    /// The requesting user (prospective buyer).
    pub client: UserId,
    /// The listing owner at the time the request was made.
    pub recipient: UserId,
    pub property: ListingId,
    pub appointment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Users who have acknowledged this appointment (badge suppression).
    pub seen_by: Vec<UserId>,
    pub status: RequestStatus,
}

impl Appointment {
    /// Whether `user` is the client or the recipient of this appointment.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.client == user || self.recipient == user
    }
}

/// Appointment with its references resolved for API responses.
///
/// Resolved fields are `None` when the referenced document no longer exists,
/// mirroring how a dangling document reference resolves to null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: AppointmentId,
    pub client: Option<UserSummary>,
    pub recipient: Option<UserSummary>,
    pub property: Option<ListingSummary>,
    pub appointment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub seen_by: Vec<UserId>,
    pub status: RequestStatus,
}
