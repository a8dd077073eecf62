//! Document store seam.
//!
//! The store is an external collaborator holding Users, Listings,
//! Appointments and Clients as flat documents. Services talk to it through
//! the traits below; [`memory::MemoryStore`] backs tests and local
//! development, [`postgres::PgStore`] backs deployments.
//!
//! Read-modify-write sequences that would race under concurrent requests
//! (favorite toggling, rating upserts, the confirmed-appointment client
//! upsert, seen-set maintenance) are store primitives: each backend performs
//! them atomically per document, so two concurrent toggles net out to a
//! correct toggle and two concurrent confirmations converge on one client
//! record.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use hearth_core::{AppointmentId, ClientId, ListingId, RequestStatus, UserId};

use crate::models::{Appointment, Client, Listing, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated (e.g. duplicate user email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored document could not be decoded into its model.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// User collection operations.
#[async_trait]
pub trait UserStore {
    /// Insert a new user. Fails with [`StoreError::Conflict`] if the email
    /// is already registered.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Listing collection operations.
#[async_trait]
pub trait ListingStore {
    /// All listings, optionally filtered by owner.
    async fn listings(&self, owner: Option<UserId>) -> Result<Vec<Listing>, StoreError>;

    /// Listings ordered by view count, highest first.
    async fn trending_listings(&self, limit: usize) -> Result<Vec<Listing>, StoreError>;

    async fn listing(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError>;

    /// Replace the stored document. Returns `None` if it no longer exists.
    async fn replace_listing(&self, listing: Listing) -> Result<Option<Listing>, StoreError>;

    /// Returns `true` if a document was deleted.
    async fn delete_listing(&self, id: ListingId) -> Result<bool, StoreError>;

    /// Atomic fetch-and-increment of the view counter.
    async fn increment_views(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Atomically replace-or-append `user`'s rating entry and recompute the
    /// stored mean.
    async fn upsert_rating(
        &self,
        id: ListingId,
        user: UserId,
        value: f64,
    ) -> Result<Option<Listing>, StoreError>;

    /// Atomically toggle `user`'s membership in the favorites set.
    ///
    /// Returns the post-toggle membership and the updated listing.
    async fn toggle_favorite(
        &self,
        id: ListingId,
        user: UserId,
    ) -> Result<Option<(bool, Listing)>, StoreError>;
}

/// Appointment collection operations.
#[async_trait]
pub trait AppointmentStore {
    async fn appointment(&self, id: AppointmentId)
    -> Result<Option<Appointment>, StoreError>;

    /// Appointments where `user` is the requester.
    async fn appointments_by_client(&self, user: UserId)
    -> Result<Vec<Appointment>, StoreError>;

    /// Appointments where `user` is the listing owner.
    async fn appointments_by_recipient(
        &self,
        user: UserId,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError>;

    async fn replace_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Option<Appointment>, StoreError>;

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, StoreError>;

    /// Write the status unconditionally; no transition table is enforced.
    async fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: RequestStatus,
    ) -> Result<Option<Appointment>, StoreError>;

    /// Add `user` to the seen set of every appointment they participate in.
    /// Idempotent; returns the number of documents changed.
    async fn mark_appointments_seen(&self, user: UserId) -> Result<u64, StoreError>;

    /// Appointments where `user` participates, the status is not cancelled
    /// and `user` is absent from the seen set.
    async fn count_unseen_appointments(&self, user: UserId) -> Result<u64, StoreError>;
}

/// Pipeline client collection operations.
#[async_trait]
pub trait ClientStore {
    async fn client(&self, id: ClientId) -> Result<Option<Client>, StoreError>;

    async fn clients(&self) -> Result<Vec<Client>, StoreError>;

    async fn clients_by_agent(&self, agent: UserId) -> Result<Vec<Client>, StoreError>;

    async fn insert_client(&self, client: Client) -> Result<Client, StoreError>;

    async fn replace_client(&self, client: Client) -> Result<Option<Client>, StoreError>;

    async fn delete_client(&self, id: ClientId) -> Result<bool, StoreError>;

    /// Atomic lookup-or-create keyed by `(email, property)`.
    ///
    /// If a matching record exists its status is set to confirmed and its
    /// property refreshed, leaving payment and notes untouched; otherwise
    /// `template` is inserted as-is. Concurrent calls for the same key
    /// converge on a single record.
    async fn upsert_confirmed_client(
        &self,
        email: &str,
        property: ListingId,
        template: Client,
    ) -> Result<Client, StoreError>;

    /// Idempotently add `user` to a single record's seen set.
    async fn mark_client_seen(
        &self,
        id: ClientId,
        user: UserId,
    ) -> Result<Option<Client>, StoreError>;

    /// Add `agent` to the seen set of every record they own. Returns the
    /// number of documents changed.
    async fn mark_clients_seen(&self, agent: UserId) -> Result<u64, StoreError>;

    /// Records owned by `agent` whose seen set does not contain them.
    async fn count_unseen_clients(&self, agent: UserId) -> Result<u64, StoreError>;
}

/// The full document store contract.
#[async_trait]
pub trait DocumentStore:
    UserStore + ListingStore + AppointmentStore + ClientStore + Send + Sync
{
    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
