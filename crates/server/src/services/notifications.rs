//! Notification badge counts.
//!
//! Counts are recomputed from the seen sets on every call; nothing is
//! cached, so a `markAllSeen` immediately drops the badge to zero.

use serde::Serialize;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::store::DocumentStore;

/// Badge counts for the navigation bar.
#[derive(Debug, Serialize)]
pub struct NotificationCounts {
    /// Pipeline records owned by the caller they have not acknowledged.
    pub new_clients: u64,
    /// Non-cancelled appointments involving the caller they have not
    /// acknowledged.
    pub new_appointments: u64,
}

/// Notification counter.
pub struct NotificationService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> NotificationService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Current badge counts for the caller.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn counts(&self, caller: CurrentUser) -> Result<NotificationCounts> {
        let new_clients = self.store.count_unseen_clients(caller.id).await?;
        let new_appointments = self.store.count_unseen_appointments(caller.id).await?;

        Ok(NotificationCounts {
            new_clients,
            new_appointments,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use hearth_core::{
        AppointmentId, ClientId, ListingId, RequestStatus, Role, UserId,
    };

    use super::*;
    use crate::models::{Appointment, Client};
    use crate::store::{AppointmentStore, ClientStore, MemoryStore};

    fn caller() -> CurrentUser {
        CurrentUser {
            id: UserId::generate(),
            role: Role::Agent,
        }
    }

    fn appointment(user: CurrentUser, status: RequestStatus) -> Appointment {
        Appointment {
            id: AppointmentId::generate(),
            client: UserId::generate(),
            recipient: user.id,
            property: ListingId::generate(),
            appointment_date: Utc::now(),
            notes: None,
            seen_by: Vec::new(),
            status,
        }
    }

    fn pipeline_entry(agent: CurrentUser) -> Client {
        let now = Utc::now();
        Client {
            id: ClientId::generate(),
            name: "N".into(),
            email: "n@example.com".into(),
            phone: String::new(),
            notes: None,
            agent: agent.id,
            property: None,
            status: RequestStatus::Pending,
            payment_done: false,
            seen_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn cancelled_appointments_do_not_count() {
        let store = MemoryStore::new();
        let me = caller();

        store
            .insert_appointment(appointment(me, RequestStatus::Pending))
            .await
            .expect("insert");
        store
            .insert_appointment(appointment(me, RequestStatus::Cancelled))
            .await
            .expect("insert");

        let counts = NotificationService::new(&store)
            .counts(me)
            .await
            .expect("counts");
        assert_eq!(counts.new_appointments, 1);
    }

    #[tokio::test]
    async fn mark_all_seen_zeroes_the_badges() {
        let store = MemoryStore::new();
        let me = caller();
        let svc = NotificationService::new(&store);

        store
            .insert_appointment(appointment(me, RequestStatus::Confirmed))
            .await
            .expect("insert");
        store
            .insert_client(pipeline_entry(me))
            .await
            .expect("insert");

        let before = svc.counts(me).await.expect("counts");
        assert_eq!(before.new_appointments, 1);
        assert_eq!(before.new_clients, 1);

        store.mark_appointments_seen(me.id).await.expect("seen");
        store.mark_clients_seen(me.id).await.expect("seen");

        let after = svc.counts(me).await.expect("counts");
        assert_eq!(after.new_appointments, 0);
        assert_eq!(after.new_clients, 0);
    }

    #[tokio::test]
    async fn other_agents_records_never_count() {
        let store = MemoryStore::new();
        let me = caller();
        let other = caller();

        store
            .insert_client(pipeline_entry(other))
            .await
            .expect("insert");

        let counts = NotificationService::new(&store)
            .counts(me)
            .await
            .expect("counts");
        assert_eq!(counts.new_clients, 0);
    }
}
