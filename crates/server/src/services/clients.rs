//! Sales-pipeline client service.
//!
//! Pipeline records are agent-scoped: admins see everything, agents only
//! their own book. Manual creation always inserts a fresh record; only the
//! appointment-confirmation path deduplicates by `(email, property)`.

use chrono::Utc;
use serde::Deserialize;

use hearth_core::{ClientId, ListingId, RequestStatus};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Client, ClientView, ListingSummary, UserSummary};
use crate::store::{DocumentStore, StoreError};

/// Fields accepted when manually adding a pipeline entry.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub property: Option<ListingId>,
}

/// Mutable fields of a pipeline entry. The owning agent and the seen set
/// cannot be patched.
#[derive(Debug, Default, Deserialize)]
pub struct ClientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub property: Option<ListingId>,
    #[serde(default)]
    pub payment_done: Option<bool>,
    #[serde(default)]
    pub status: Option<RequestStatus>,
}

/// Pipeline client service.
pub struct ClientService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ClientService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// The caller's pipeline: everything for admins, own records for agents.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn list(&self, caller: CurrentUser) -> Result<Vec<ClientView>> {
        let records = if caller.role.is_admin() {
            self.store.clients().await?
        } else {
            self.store.clients_by_agent(caller.id).await?
        };

        let mut views = Vec::with_capacity(records.len());
        for record in &records {
            views.push(resolve_view(self.store, record).await?);
        }
        Ok(views)
    }

    /// A single pipeline record. Owning agent or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` if missing, `Forbidden` for anyone else.
    pub async fn get(&self, id: ClientId, caller: CurrentUser) -> Result<ClientView> {
        let record = self.load_for_agent(id, caller).await?;
        Ok(resolve_view(self.store, &record).await?)
    }

    /// Manually add a pipeline entry owned by the caller.
    ///
    /// Always inserts; duplicates of the same email are allowed here, unlike
    /// the confirmation path.
    ///
    /// # Errors
    ///
    /// `Validation` when name or email is empty.
    pub async fn create(&self, caller: CurrentUser, input: CreateClient) -> Result<ClientView> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(AppError::Validation(
                "name and email are required".to_owned(),
            ));
        }

        let now = Utc::now();
        let record = Client {
            id: ClientId::generate(),
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            phone: input.phone.unwrap_or_default(),
            notes: input.notes,
            agent: caller.id,
            property: input.property,
            status: RequestStatus::Pending,
            payment_done: false,
            seen_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let record = self.store.insert_client(record).await?;
        Ok(resolve_view(self.store, &record).await?)
    }

    /// Apply an allow-listed patch. Owning agent or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::get`].
    pub async fn update(
        &self,
        id: ClientId,
        caller: CurrentUser,
        patch: ClientPatch,
    ) -> Result<ClientView> {
        let mut record = self.load_for_agent(id, caller).await?;

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = email;
        }
        if let Some(phone) = patch.phone {
            record.phone = phone;
        }
        if let Some(notes) = patch.notes {
            record.notes = Some(notes);
        }
        if let Some(property) = patch.property {
            record.property = Some(property);
        }
        if let Some(payment_done) = patch.payment_done {
            record.payment_done = payment_done;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        let record = self
            .store
            .replace_client(record)
            .await?
            .ok_or(AppError::NotFound("client"))?;
        Ok(resolve_view(self.store, &record).await?)
    }

    /// Delete a pipeline record. Owning agent or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::get`].
    pub async fn delete(&self, id: ClientId, caller: CurrentUser) -> Result<()> {
        self.load_for_agent(id, caller).await?;
        self.store.delete_client(id).await?;
        Ok(())
    }

    /// Move a pipeline record to confirmed. Owning agent or admin only.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Forbidden` as for [`Self::get`].
    pub async fn confirm(&self, id: ClientId, caller: CurrentUser) -> Result<ClientView> {
        let mut record = self.load_for_agent(id, caller).await?;
        record.status = RequestStatus::Confirmed;
        record.updated_at = Utc::now();

        let record = self
            .store
            .replace_client(record)
            .await?
            .ok_or(AppError::NotFound("client"))?;

        tracing::info!(client = %record.id, agent = %record.agent, "pipeline client confirmed");
        Ok(resolve_view(self.store, &record).await?)
    }

    /// Acknowledge a single record for the caller. Idempotent.
    ///
    /// # Errors
    ///
    /// `NotFound` if the record does not exist.
    pub async fn mark_seen(&self, id: ClientId, caller: CurrentUser) -> Result<()> {
        self.store
            .mark_client_seen(id, caller.id)
            .await?
            .ok_or(AppError::NotFound("client"))?;
        Ok(())
    }

    /// Acknowledge every record owned by the caller.
    ///
    /// # Errors
    ///
    /// `Store` on backend failure.
    pub async fn mark_all_seen(&self, caller: CurrentUser) -> Result<u64> {
        Ok(self.store.mark_clients_seen(caller.id).await?)
    }

    async fn load_for_agent(&self, id: ClientId, caller: CurrentUser) -> Result<Client> {
        let record = self
            .store
            .client(id)
            .await?
            .ok_or(AppError::NotFound("client"))?;

        if record.agent != caller.id && !caller.role.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(record)
    }
}

/// Resolve a record's agent and property references for an API response.
pub(crate) async fn resolve_view(
    store: &dyn DocumentStore,
    record: &Client,
) -> std::result::Result<ClientView, StoreError> {
    let agent = store.user(record.agent).await?;
    let property = match record.property {
        Some(id) => store.listing(id).await?,
        None => None,
    };

    Ok(ClientView {
        id: record.id,
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        notes: record.notes.clone(),
        agent: agent.as_ref().map(UserSummary::from),
        property: property.as_ref().map(ListingSummary::from),
        status: record.status,
        payment_done: record.payment_done,
        seen_by: record.seen_by.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use hearth_core::{Email, Role, UserId};

    use super::*;
    use crate::models::User;
    use crate::store::{ClientStore, MemoryStore, UserStore};

    async fn agent(store: &MemoryStore, email: &str) -> CurrentUser {
        let user = store
            .insert_user(User {
                id: UserId::generate(),
                name: "Agent".into(),
                email: Email::parse(email).expect("email"),
                phone: None,
                password_hash: String::new(),
                role: Role::Agent,
                created_at: Utc::now(),
            })
            .await
            .expect("insert");
        CurrentUser {
            id: user.id,
            role: user.role,
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: UserId::generate(),
            role: Role::Admin,
        }
    }

    fn entry(name: &str, email: &str) -> CreateClient {
        CreateClient {
            name: name.into(),
            email: email.into(),
            phone: None,
            notes: None,
            property: None,
        }
    }

    #[tokio::test]
    async fn manual_creation_never_deduplicates() {
        let store = MemoryStore::new();
        let svc = ClientService::new(&store);
        let caller = agent(&store, "a@example.com").await;

        svc.create(caller, entry("Nina", "nina@example.com"))
            .await
            .expect("create");
        svc.create(caller, entry("Nina", "nina@example.com"))
            .await
            .expect("create");

        assert_eq!(store.clients().await.expect("clients").len(), 2);
    }

    #[tokio::test]
    async fn agents_only_see_their_own_book() {
        let store = MemoryStore::new();
        let svc = ClientService::new(&store);
        let alice = agent(&store, "alice@example.com").await;
        let bob = agent(&store, "bob@example.com").await;

        svc.create(alice, entry("N", "n@example.com"))
            .await
            .expect("create");
        svc.create(bob, entry("M", "m@example.com"))
            .await
            .expect("create");

        assert_eq!(svc.list(alice).await.expect("list").len(), 1);
        assert_eq!(svc.list(admin()).await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn foreign_records_are_forbidden() {
        let store = MemoryStore::new();
        let svc = ClientService::new(&store);
        let alice = agent(&store, "alice@example.com").await;
        let bob = agent(&store, "bob@example.com").await;

        let record = svc
            .create(alice, entry("N", "n@example.com"))
            .await
            .expect("create");

        assert!(matches!(
            svc.get(record.id, bob).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            svc.confirm(record.id, bob).await,
            Err(AppError::Forbidden)
        ));

        // Admin override works.
        let confirmed = svc.confirm(record.id, admin()).await.expect("confirm");
        assert_eq!(confirmed.status, RequestStatus::Confirmed);
    }

    #[tokio::test]
    async fn patch_cannot_move_a_record_between_agents() {
        let store = MemoryStore::new();
        let svc = ClientService::new(&store);
        let alice = agent(&store, "alice@example.com").await;

        let record = svc
            .create(alice, entry("N", "n@example.com"))
            .await
            .expect("create");

        let patch = ClientPatch {
            payment_done: Some(true),
            ..ClientPatch::default()
        };
        svc.update(record.id, alice, patch).await.expect("update");

        let stored = store
            .client(record.id)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(stored.agent, alice.id);
        assert!(stored.payment_done);
    }

    #[tokio::test]
    async fn mark_seen_is_idempotent() {
        let store = MemoryStore::new();
        let svc = ClientService::new(&store);
        let alice = agent(&store, "alice@example.com").await;

        let record = svc
            .create(alice, entry("N", "n@example.com"))
            .await
            .expect("create");

        svc.mark_seen(record.id, alice).await.expect("seen");
        svc.mark_seen(record.id, alice).await.expect("seen");

        let stored = store
            .client(record.id)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(stored.seen_by, vec![alice.id]);
    }
}
