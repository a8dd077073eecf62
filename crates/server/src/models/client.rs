//! Sales-pipeline client model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hearth_core::{ClientId, ListingId, RequestStatus, UserId};

use super::{ListingSummary, UserSummary};

/// A sales-pipeline entry tracking a prospective buyer for an agent.
///
/// Distinct from the user identity system: name/email/phone are denormalized
/// copies, and the record only loosely identifies a real user via its email.
/// The appointment-confirmation path treats `(email, property)` as the
/// lookup-or-create key; manual entries carry no such constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The agent who owns this pipeline entry.
    pub agent: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<ListingId>,
    pub status: RequestStatus,
    pub payment_done: bool,
    /// Users who have acknowledged this record (badge suppression).
    pub seen_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client with its references resolved for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientView {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub agent: Option<UserSummary>,
    pub property: Option<ListingSummary>,
    pub status: RequestStatus,
    pub payment_done: bool,
    pub seen_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
