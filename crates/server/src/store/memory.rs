//! In-memory document store.
//!
//! Backs unit tests and local development (`HEARTH_STORE=memory`). Every
//! collection sits behind its own `RwLock`, and each mutating primitive
//! holds the write guard for the whole read-modify-write step, which is what
//! makes the toggle/upsert operations atomic here.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use hearth_core::{AppointmentId, ClientId, ListingId, RequestStatus, UserId};

use crate::models::{Appointment, Client, Listing, User};

use super::{
    AppointmentStore, ClientStore, DocumentStore, ListingStore, StoreError, UserStore,
};

/// In-memory store over per-collection `BTreeMap`s (deterministic iteration
/// order keeps list responses stable).
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<UserId, User>>,
    listings: RwLock<BTreeMap<ListingId, Listing>>,
    appointments: RwLock<BTreeMap<AppointmentId, Appointment>>,
    clients: RwLock<BTreeMap<ClientId, Client>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn listings(&self, owner: Option<UserId>) -> Result<Vec<Listing>, StoreError> {
        let listings = self.listings.read().await;
        Ok(listings
            .values()
            .filter(|l| owner.is_none_or(|o| l.owner == o))
            .cloned()
            .collect())
    }

    async fn trending_listings(&self, limit: usize) -> Result<Vec<Listing>, StoreError> {
        let mut all: Vec<Listing> = self.listings.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.views.cmp(&a.views));
        all.truncate(limit);
        Ok(all)
    }

    async fn listing(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn replace_listing(&self, listing: Listing) -> Result<Option<Listing>, StoreError> {
        let mut listings = self.listings.write().await;
        if !listings.contains_key(&listing.id) {
            return Ok(None);
        }
        listings.insert(listing.id, listing.clone());
        Ok(Some(listing))
    }

    async fn delete_listing(&self, id: ListingId) -> Result<bool, StoreError> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }

    async fn increment_views(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|l| {
            l.views += 1;
            l.clone()
        }))
    }

    async fn upsert_rating(
        &self,
        id: ListingId,
        user: UserId,
        value: f64,
    ) -> Result<Option<Listing>, StoreError> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|l| {
            l.apply_rating(user, value);
            l.clone()
        }))
    }

    async fn toggle_favorite(
        &self,
        id: ListingId,
        user: UserId,
    ) -> Result<Option<(bool, Listing)>, StoreError> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|l| {
            let now_favorite = l.toggle_favorite(user);
            (now_favorite, l.clone())
        }))
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn appointments_by_client(
        &self,
        user: UserId,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.client == user)
            .cloned()
            .collect())
    }

    async fn appointments_by_recipient(
        &self,
        user: UserId,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.recipient == user)
            .cloned()
            .collect())
    }

    async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn replace_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut appointments = self.appointments.write().await;
        if !appointments.contains_key(&appointment.id) {
            return Ok(None);
        }
        appointments.insert(appointment.id, appointment.clone());
        Ok(Some(appointment))
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, StoreError> {
        Ok(self.appointments.write().await.remove(&id).is_some())
    }

    async fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: RequestStatus,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.get_mut(&id).map(|a| {
            a.status = status;
            a.clone()
        }))
    }

    async fn mark_appointments_seen(&self, user: UserId) -> Result<u64, StoreError> {
        let mut appointments = self.appointments.write().await;
        let mut changed = 0;
        for appointment in appointments.values_mut() {
            if appointment.is_participant(user) && !appointment.seen_by.contains(&user) {
                appointment.seen_by.push(user);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unseen_appointments(&self, user: UserId) -> Result<u64, StoreError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .values()
            .filter(|a| {
                a.is_participant(user)
                    && a.status != RequestStatus::Cancelled
                    && !a.seen_by.contains(&user)
            })
            .count() as u64)
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        Ok(self.clients.read().await.get(&id).cloned())
    }

    async fn clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.clients.read().await.values().cloned().collect())
    }

    async fn clients_by_agent(&self, agent: UserId) -> Result<Vec<Client>, StoreError> {
        Ok(self
            .clients
            .read()
            .await
            .values()
            .filter(|c| c.agent == agent)
            .cloned()
            .collect())
    }

    async fn insert_client(&self, client: Client) -> Result<Client, StoreError> {
        self.clients.write().await.insert(client.id, client.clone());
        Ok(client)
    }

    async fn replace_client(&self, client: Client) -> Result<Option<Client>, StoreError> {
        let mut clients = self.clients.write().await;
        if !clients.contains_key(&client.id) {
            return Ok(None);
        }
        let mut client = client;
        client.updated_at = Utc::now();
        clients.insert(client.id, client.clone());
        Ok(Some(client))
    }

    async fn delete_client(&self, id: ClientId) -> Result<bool, StoreError> {
        Ok(self.clients.write().await.remove(&id).is_some())
    }

    async fn upsert_confirmed_client(
        &self,
        email: &str,
        property: ListingId,
        template: Client,
    ) -> Result<Client, StoreError> {
        let mut clients = self.clients.write().await;

        let existing = clients
            .values_mut()
            .find(|c| c.email == email && c.property == Some(property));

        if let Some(record) = existing {
            record.property = Some(property);
            record.status = RequestStatus::Confirmed;
            record.updated_at = Utc::now();
            return Ok(record.clone());
        }

        clients.insert(template.id, template.clone());
        Ok(template)
    }

    async fn mark_client_seen(
        &self,
        id: ClientId,
        user: UserId,
    ) -> Result<Option<Client>, StoreError> {
        let mut clients = self.clients.write().await;
        Ok(clients.get_mut(&id).map(|c| {
            if !c.seen_by.contains(&user) {
                c.seen_by.push(user);
            }
            c.clone()
        }))
    }

    async fn mark_clients_seen(&self, agent: UserId) -> Result<u64, StoreError> {
        let mut clients = self.clients.write().await;
        let mut changed = 0;
        for client in clients.values_mut() {
            if client.agent == agent && !client.seen_by.contains(&agent) {
                client.seen_by.push(agent);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unseen_clients(&self, agent: UserId) -> Result<u64, StoreError> {
        let clients = self.clients.read().await;
        Ok(clients
            .values()
            .filter(|c| c.agent == agent && !c.seen_by.contains(&agent))
            .count() as u64)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
