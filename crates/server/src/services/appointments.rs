//! Appointment service.
//!
//! Owns the status/pipeline synchronization rule: confirming an appointment
//! materializes (or refreshes) a pipeline client for the listing owner.
//! Pending and cancelled transitions never touch the pipeline, so a
//! confirm-then-cancel leaves the client record behind by design.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hearth_core::{AppointmentId, ClientId, ListingId, RequestStatus, UserId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Appointment, AppointmentView, Client, ClientView, ListingSummary, UserSummary};
use crate::services::clients;
use crate::store::{DocumentStore, StoreError};

/// Fields accepted when booking a viewing.
#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    pub property: ListingId,
    pub appointment_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Mutable fields of an appointment. Participants, status and the seen set
/// have dedicated operations and cannot be patched.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default)]
    pub appointment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The caller's appointments, split by direction.
#[derive(Debug, Serialize)]
pub struct AppointmentFeed {
    /// Viewings the caller requested on someone else's listing.
    pub outgoing: Vec<AppointmentView>,
    /// Viewings requested on the caller's own listings.
    pub incoming: Vec<AppointmentView>,
}

/// Response of a status change: the refreshed appointment, plus the pipeline
/// client when the new status is confirmed.
#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub appointment: AppointmentView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientView>,
}

/// Appointment service.
pub struct AppointmentService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> AppointmentService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// The caller's appointments in both directions, references resolved.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn list_for_user(&self, caller: CurrentUser) -> Result<AppointmentFeed> {
        let outgoing = self.store.appointments_by_client(caller.id).await?;
        let incoming = self.store.appointments_by_recipient(caller.id).await?;

        Ok(AppointmentFeed {
            outgoing: self.resolve_all(outgoing).await?,
            incoming: self.resolve_all(incoming).await?,
        })
    }

    /// A single appointment. Participants only.
    ///
    /// # Errors
    ///
    /// `NotFound` if missing, `Forbidden` for non-participants.
    pub async fn get(&self, id: AppointmentId, caller: CurrentUser) -> Result<AppointmentView> {
        let appointment = self.load_for_participant(id, caller).await?;
        Ok(self.resolve(&appointment).await?)
    }

    /// Book a viewing on a listing.
    ///
    /// The recipient is snapshotted from the listing's current owner and
    /// never re-resolved afterward.
    ///
    /// # Errors
    ///
    /// `NotFound` if the listing does not exist.
    pub async fn create(
        &self,
        caller: CurrentUser,
        input: CreateAppointment,
    ) -> Result<AppointmentView> {
        let listing = self
            .store
            .listing(input.property)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        let appointment = Appointment {
            id: AppointmentId::generate(),
            client: caller.id,
            recipient: listing.owner,
            property: listing.id,
            appointment_date: input.appointment_date,
            notes: input.notes,
            seen_by: Vec::new(),
            status: RequestStatus::Pending,
        };

        let appointment = self.store.insert_appointment(appointment).await?;
        Ok(self.resolve(&appointment).await?)
    }

    /// Reschedule or annotate an appointment. Participants only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::get`].
    pub async fn update(
        &self,
        id: AppointmentId,
        caller: CurrentUser,
        patch: AppointmentPatch,
    ) -> Result<AppointmentView> {
        let mut appointment = self.load_for_participant(id, caller).await?;

        if let Some(date) = patch.appointment_date {
            appointment.appointment_date = date;
        }
        if let Some(notes) = patch.notes {
            appointment.notes = Some(notes);
        }

        let appointment = self
            .store
            .replace_appointment(appointment)
            .await?
            .ok_or(AppError::NotFound("appointment"))?;
        Ok(self.resolve(&appointment).await?)
    }

    /// Delete an appointment. Participants only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::get`].
    pub async fn delete(&self, id: AppointmentId, caller: CurrentUser) -> Result<()> {
        self.load_for_participant(id, caller).await?;
        self.store.delete_appointment(id).await?;
        Ok(())
    }

    /// Set the status of an appointment and synchronize the pipeline.
    ///
    /// The status is written unconditionally; any of the three values may
    /// replace any other. When the new status is `confirmed`, a pipeline
    /// client keyed by the requester's email and the property is created or
    /// refreshed in the same call: new records start unpaid and owned by the
    /// appointment's recipient, existing records keep their payment flag and
    /// notes. Pending and cancelled writes never touch the pipeline.
    ///
    /// # Errors
    ///
    /// `NotFound` if the appointment (or, on the confirm path, the
    /// requesting user) is missing, `Forbidden` for non-participants.
    pub async fn set_status(
        &self,
        id: AppointmentId,
        caller: CurrentUser,
        status: RequestStatus,
    ) -> Result<StatusChange> {
        self.load_for_participant(id, caller).await?;

        let appointment = self
            .store
            .set_appointment_status(id, status)
            .await?
            .ok_or(AppError::NotFound("appointment"))?;

        let client = if status == RequestStatus::Confirmed {
            Some(self.sync_pipeline(&appointment).await?)
        } else {
            None
        };

        Ok(StatusChange {
            appointment: self.resolve(&appointment).await?,
            client,
        })
    }

    /// Materialize or refresh the pipeline client for a confirmed viewing.
    async fn sync_pipeline(&self, appointment: &Appointment) -> Result<ClientView> {
        let user = self
            .store
            .user(appointment.client)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let now = Utc::now();
        let template = Client {
            id: ClientId::generate(),
            name: user.name.clone(),
            email: user.email.to_string(),
            phone: user.phone.clone().unwrap_or_default(),
            notes: None,
            agent: appointment.recipient,
            property: Some(appointment.property),
            status: RequestStatus::Confirmed,
            payment_done: false,
            seen_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let record = self
            .store
            .upsert_confirmed_client(user.email.as_str(), appointment.property, template)
            .await?;

        tracing::info!(
            appointment = %appointment.id,
            client = %record.id,
            agent = %record.agent,
            "viewing confirmed, pipeline client synchronized"
        );

        Ok(clients::resolve_view(self.store, &record).await?)
    }

    /// Acknowledge every appointment the caller participates in.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn mark_all_seen(&self, caller: CurrentUser) -> Result<u64> {
        Ok(self.store.mark_appointments_seen(caller.id).await?)
    }

    /// Best-effort notification hook for the listing owner.
    ///
    /// Resolves appointment, listing and owner so a dangling chain surfaces
    /// as `NotFound`; the notification channel itself is a log line.
    ///
    /// # Errors
    ///
    /// `NotFound` when any link of the chain is missing.
    pub async fn notify_lister(&self, id: AppointmentId) -> Result<()> {
        let appointment = self
            .store
            .appointment(id)
            .await?
            .ok_or(AppError::NotFound("appointment"))?;

        let listing = self
            .store
            .listing(appointment.property)
            .await?
            .ok_or(AppError::NotFound("listing"))?;

        let lister = self
            .store
            .user(listing.owner)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        tracing::info!(
            appointment = %appointment.id,
            lister = %lister.email,
            "notifying lister about appointment"
        );

        Ok(())
    }

    async fn load_for_participant(
        &self,
        id: AppointmentId,
        caller: CurrentUser,
    ) -> Result<Appointment> {
        let appointment = self
            .store
            .appointment(id)
            .await?
            .ok_or(AppError::NotFound("appointment"))?;

        if !appointment.is_participant(caller.id) {
            return Err(AppError::Forbidden);
        }
        Ok(appointment)
    }

    async fn resolve_all(
        &self,
        appointments: Vec<Appointment>,
    ) -> std::result::Result<Vec<AppointmentView>, StoreError> {
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in &appointments {
            views.push(self.resolve(appointment).await?);
        }
        Ok(views)
    }

    /// Resolve document references; dangling ones become `None`.
    async fn resolve(
        &self,
        appointment: &Appointment,
    ) -> std::result::Result<AppointmentView, StoreError> {
        let client = self.store.user(appointment.client).await?;
        let recipient = self.store.user(appointment.recipient).await?;
        let property = self.store.listing(appointment.property).await?;

        Ok(AppointmentView {
            id: appointment.id,
            client: client.as_ref().map(UserSummary::from),
            recipient: recipient.as_ref().map(UserSummary::from),
            property: property.as_ref().map(ListingSummary::from),
            appointment_date: appointment.appointment_date,
            notes: appointment.notes.clone(),
            seen_by: appointment.seen_by.clone(),
            status: appointment.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use hearth_core::{Email, Role};

    use super::*;
    use crate::models::{Listing, User};
    use crate::store::{
        AppointmentStore, ClientStore, ListingStore, MemoryStore, UserStore,
    };

    async fn user(store: &MemoryStore, name: &str, email: &str, role: Role) -> User {
        store
            .insert_user(User {
                id: UserId::generate(),
                name: name.to_owned(),
                email: Email::parse(email).expect("email"),
                phone: Some("555-0100".to_owned()),
                password_hash: String::new(),
                role,
                created_at: Utc::now(),
            })
            .await
            .expect("insert user")
    }

    async fn listing(store: &MemoryStore, owner: UserId) -> Listing {
        store
            .insert_listing(Listing {
                id: ListingId::generate(),
                title: "Canal-side loft".into(),
                description: None,
                price: 320_000.0,
                location: None,
                images: vec!["https://img.example/loft.png".into()],
                owner,
                views: 0,
                favorites: Vec::new(),
                ratings: Vec::new(),
                rating: 0.0,
            })
            .await
            .expect("insert listing")
    }

    fn as_caller(u: &User) -> CurrentUser {
        CurrentUser {
            id: u.id,
            role: u.role,
        }
    }

    async fn booked(
        store: &MemoryStore,
    ) -> (User, User, Listing, AppointmentView) {
        let owner = user(store, "Olive Owner", "olive@example.com", Role::Agent).await;
        let buyer = user(store, "Bram Buyer", "bram@example.com", Role::Agent).await;
        let property = listing(store, owner.id).await;

        let view = AppointmentService::new(store)
            .create(
                as_caller(&buyer),
                CreateAppointment {
                    property: property.id,
                    appointment_date: Utc::now(),
                    notes: Some("after work".into()),
                },
            )
            .await
            .expect("create");

        (owner, buyer, property, view)
    }

    #[tokio::test]
    async fn create_snapshots_recipient_from_listing_owner() {
        let store = MemoryStore::new();
        let (owner, buyer, property, view) = booked(&store).await;

        assert_eq!(view.status, RequestStatus::Pending);
        assert_eq!(view.recipient.as_ref().map(|u| u.id), Some(owner.id));
        assert_eq!(view.client.as_ref().map(|u| u.id), Some(buyer.id));
        assert_eq!(view.property.as_ref().map(|p| p.id), Some(property.id));
    }

    #[tokio::test]
    async fn create_against_missing_listing_is_not_found() {
        let store = MemoryStore::new();
        let buyer = user(&store, "B", "b@example.com", Role::Agent).await;

        let err = AppointmentService::new(&store)
            .create(
                as_caller(&buyer),
                CreateAppointment {
                    property: ListingId::generate(),
                    appointment_date: Utc::now(),
                    notes: None,
                },
            )
            .await;
        assert!(matches!(err, Err(AppError::NotFound("listing"))));
    }

    #[tokio::test]
    async fn confirming_creates_a_pipeline_client_owned_by_the_recipient() {
        let store = MemoryStore::new();
        let (owner, buyer, property, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let change = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm");

        assert_eq!(change.appointment.status, RequestStatus::Confirmed);
        let client = change.client.expect("client record");
        assert_eq!(client.email, buyer.email.as_str());
        assert_eq!(client.agent.as_ref().map(|a| a.id), Some(owner.id));
        assert_eq!(client.property.as_ref().map(|p| p.id), Some(property.id));
        assert_eq!(client.status, RequestStatus::Confirmed);
        assert!(!client.payment_done);
    }

    #[tokio::test]
    async fn double_confirm_converges_on_one_client_record() {
        let store = MemoryStore::new();
        let (owner, _, _, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let first = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm")
            .client
            .expect("client");
        let second = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm")
            .client
            .expect("client");

        assert_eq!(first.id, second.id);
        assert_eq!(store.clients().await.expect("clients").len(), 1);
    }

    #[tokio::test]
    async fn reconfirm_preserves_payment_progress() {
        let store = MemoryStore::new();
        let (owner, _, _, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let client = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm")
            .client
            .expect("client");

        // Agent records the payment out of band.
        let mut record = store
            .client(client.id)
            .await
            .expect("get")
            .expect("exists");
        record.payment_done = true;
        store.replace_client(record).await.expect("replace");

        let refreshed = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm")
            .client
            .expect("client");
        assert!(refreshed.payment_done);
    }

    #[tokio::test]
    async fn cancel_never_touches_the_pipeline() {
        let store = MemoryStore::new();
        let (owner, _, _, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let change = svc
            .set_status(view.id, as_caller(&owner), RequestStatus::Cancelled)
            .await
            .expect("cancel");
        assert!(change.client.is_none());
        assert!(store.clients().await.expect("clients").is_empty());
    }

    #[tokio::test]
    async fn confirm_then_cancel_leaves_the_client_record() {
        let store = MemoryStore::new();
        let (owner, _, _, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        svc.set_status(view.id, as_caller(&owner), RequestStatus::Confirmed)
            .await
            .expect("confirm");
        svc.set_status(view.id, as_caller(&owner), RequestStatus::Cancelled)
            .await
            .expect("cancel");

        let records = store.clients().await.expect("clients");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RequestStatus::Confirmed);
    }

    #[tokio::test]
    async fn non_participants_are_locked_out() {
        let store = MemoryStore::new();
        let (_, _, _, view) = booked(&store).await;
        let stranger = user(&store, "S", "s@example.com", Role::Agent).await;
        let svc = AppointmentService::new(&store);

        assert!(matches!(
            svc.get(view.id, as_caller(&stranger)).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            svc.set_status(view.id, as_caller(&stranger), RequestStatus::Confirmed)
                .await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            svc.delete(view.id, as_caller(&stranger)).await,
            Err(AppError::Forbidden)
        ));

        // Nothing changed.
        let unchanged = store
            .appointment(view.id)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(unchanged.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn patch_cannot_reassign_participants() {
        let store = MemoryStore::new();
        let (owner, buyer, _, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let patch = AppointmentPatch {
            notes: Some("bring keys".into()),
            ..AppointmentPatch::default()
        };
        svc.update(view.id, as_caller(&buyer), patch)
            .await
            .expect("update");

        let stored = store
            .appointment(view.id)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(stored.client, buyer.id);
        assert_eq!(stored.recipient, owner.id);
        assert_eq!(stored.notes.as_deref(), Some("bring keys"));
    }

    #[tokio::test]
    async fn feed_splits_by_direction() {
        let store = MemoryStore::new();
        let (owner, buyer, _, _) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        let buyer_feed = svc.list_for_user(as_caller(&buyer)).await.expect("feed");
        assert_eq!(buyer_feed.outgoing.len(), 1);
        assert!(buyer_feed.incoming.is_empty());

        let owner_feed = svc.list_for_user(as_caller(&owner)).await.expect("feed");
        assert!(owner_feed.outgoing.is_empty());
        assert_eq!(owner_feed.incoming.len(), 1);
    }

    #[tokio::test]
    async fn deleted_listing_resolves_to_null_in_views() {
        let store = MemoryStore::new();
        let (_, buyer, property, view) = booked(&store).await;
        store.delete_listing(property.id).await.expect("delete");

        let resolved = AppointmentService::new(&store)
            .get(view.id, as_caller(&buyer))
            .await
            .expect("get");
        assert!(resolved.property.is_none());
    }

    #[tokio::test]
    async fn notify_lister_follows_the_reference_chain() {
        let store = MemoryStore::new();
        let (_, _, property, view) = booked(&store).await;
        let svc = AppointmentService::new(&store);

        svc.notify_lister(view.id).await.expect("notify");

        store.delete_listing(property.id).await.expect("delete");
        assert!(matches!(
            svc.notify_lister(view.id).await,
            Err(AppError::NotFound("listing"))
        ));
    }
}
