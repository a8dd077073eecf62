//! `PostgreSQL` document store.
//!
//! Schema lives in `crates/server/migrations/` and is applied via
//! `hearth-cli migrate`. Queries are runtime-checked (`sqlx::query_as` with
//! binds) because the store backend is selected at startup and builds must
//! not require a live database.
//!
//! The concurrency-sensitive primitives are single statements or short
//! transactions:
//! - view increment and favorite toggle are one `UPDATE ... RETURNING`;
//! - rating upsert recomputes the mean under `SELECT ... FOR UPDATE`;
//! - the confirmed-client upsert serializes per (email, property) with an
//!   advisory transaction lock, since there may be no row to lock yet.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use hearth_core::{AppointmentId, ClientId, Email, ListingId, RequestStatus, Role, UserId};

use crate::models::{Appointment, Client, Listing, RatingEntry, User};

use super::{
    AppointmentStore, ClientStore, DocumentStore, ListingStore, StoreError, UserStore,
};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (used by the CLI seeder).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, StoreError> {
        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email: Email::parse(&row.email).map_err(|e| {
                StoreError::DataCorruption(format!("invalid email in database: {e}"))
            })?,
            phone: row.phone,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>().map_err(|e| {
                StoreError::DataCorruption(format!("invalid role in database: {e}"))
            })?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    price: f64,
    location: Option<String>,
    images: Vec<String>,
    owner_id: Uuid,
    views: i64,
    favorites: Vec<Uuid>,
    ratings: Json<Vec<RatingEntry>>,
    rating: f64,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: ListingId::new(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            location: row.location,
            images: row.images,
            owner: UserId::new(row.owner_id),
            views: row.views,
            favorites: row.favorites.into_iter().map(UserId::new).collect(),
            ratings: row.ratings.0,
            rating: row.rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    client_id: Uuid,
    recipient_id: Uuid,
    property_id: Uuid,
    appointment_date: DateTime<Utc>,
    notes: Option<String>,
    seen_by: Vec<Uuid>,
    status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = StoreError;

    fn try_from(row: AppointmentRow) -> Result<Self, StoreError> {
        Ok(Self {
            id: AppointmentId::new(row.id),
            client: UserId::new(row.client_id),
            recipient: UserId::new(row.recipient_id),
            property: ListingId::new(row.property_id),
            appointment_date: row.appointment_date,
            notes: row.notes,
            seen_by: row.seen_by.into_iter().map(UserId::new).collect(),
            status: row.status.parse::<RequestStatus>().map_err(|e| {
                StoreError::DataCorruption(format!("invalid status in database: {e}"))
            })?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    notes: Option<String>,
    agent_id: Uuid,
    property_id: Option<Uuid>,
    status: String,
    payment_done: bool,
    seen_by: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = StoreError;

    fn try_from(row: ClientRow) -> Result<Self, StoreError> {
        Ok(Self {
            id: ClientId::new(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            notes: row.notes,
            agent: UserId::new(row.agent_id),
            property: row.property_id.map(ListingId::new),
            status: row.status.parse::<RequestStatus>().map_err(|e| {
                StoreError::DataCorruption(format!("invalid status in database: {e}"))
            })?,
            payment_done: row.payment_done,
            seen_by: row.seen_by.into_iter().map(UserId::new).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn uuids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.as_uuid()).collect()
}

const LISTING_COLUMNS: &str =
    "id, title, description, price, location, images, owner_id, views, favorites, ratings, rating";

const APPOINTMENT_COLUMNS: &str =
    "id, client_id, recipient_id, property_id, appointment_date, notes, seen_by, status";

const CLIENT_COLUMNS: &str = "id, name, email, phone, notes, agent_id, property_id, status, \
                              payment_done, seen_by, created_at, updated_at";

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, phone, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.constraint() == Some("users_email_unique") => {
                Err(StoreError::Conflict(format!(
                    "email already registered: {}",
                    user.email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, password_hash, role, created_at
             FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, password_hash, role, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn listings(&self, owner: Option<UserId>) -> Result<Vec<Listing>, StoreError> {
        let rows = match owner {
            Some(owner) => {
                sqlx::query_as::<_, ListingRow>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id = $1 ORDER BY id"
                ))
                .bind(owner.as_uuid())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ListingRow>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn trending_listings(&self, limit: usize) -> Result<Vec<Listing>, StoreError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings ORDER BY views DESC LIMIT $1"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn listing(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Listing::from))
    }

    async fn insert_listing(&self, listing: Listing) -> Result<Listing, StoreError> {
        sqlx::query(
            "INSERT INTO listings
                 (id, title, description, price, location, images, owner_id,
                  views, favorites, ratings, rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(listing.id.as_uuid())
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.location)
        .bind(&listing.images)
        .bind(listing.owner.as_uuid())
        .bind(listing.views)
        .bind(uuids(&listing.favorites))
        .bind(Json(&listing.ratings))
        .bind(listing.rating)
        .execute(&self.pool)
        .await?;

        Ok(listing)
    }

    async fn replace_listing(&self, listing: Listing) -> Result<Option<Listing>, StoreError> {
        let result = sqlx::query(
            "UPDATE listings SET
                 title = $2, description = $3, price = $4, location = $5, images = $6,
                 owner_id = $7, views = $8, favorites = $9, ratings = $10, rating = $11
             WHERE id = $1",
        )
        .bind(listing.id.as_uuid())
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.location)
        .bind(&listing.images)
        .bind(listing.owner.as_uuid())
        .bind(listing.views)
        .bind(uuids(&listing.favorites))
        .bind(Json(&listing.ratings))
        .bind(listing.rating)
        .execute(&self.pool)
        .await?;

        Ok((result.rows_affected() > 0).then_some(listing))
    }

    async fn delete_listing(&self, id: ListingId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "UPDATE listings SET views = views + 1 WHERE id = $1 RETURNING {LISTING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Listing::from))
    }

    async fn upsert_rating(
        &self,
        id: ListingId,
        user: UserId,
        value: f64,
    ) -> Result<Option<Listing>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut listing = Listing::from(row);
        listing.apply_rating(user, value);

        sqlx::query("UPDATE listings SET ratings = $2, rating = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(&listing.ratings))
            .bind(listing.rating)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(listing))
    }

    async fn toggle_favorite(
        &self,
        id: ListingId,
        user: UserId,
    ) -> Result<Option<(bool, Listing)>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "UPDATE listings SET favorites = CASE
                 WHEN $2 = ANY (favorites) THEN array_remove(favorites, $2)
                 ELSE array_append(favorites, $2)
             END
             WHERE id = $1
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let listing = Listing::from(row);
            let now_favorite = listing.favorites.contains(&user);
            (now_favorite, listing)
        }))
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, StoreError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Appointment::try_from).transpose()
    }

    async fn appointments_by_client(
        &self,
        user: UserId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE client_id = $1 ORDER BY appointment_date"
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn appointments_by_recipient(
        &self,
        user: UserId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE recipient_id = $1 ORDER BY appointment_date"
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        sqlx::query(
            "INSERT INTO appointments
                 (id, client_id, recipient_id, property_id, appointment_date,
                  notes, seen_by, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.client.as_uuid())
        .bind(appointment.recipient.as_uuid())
        .bind(appointment.property.as_uuid())
        .bind(appointment.appointment_date)
        .bind(&appointment.notes)
        .bind(uuids(&appointment.seen_by))
        .bind(appointment.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn replace_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Option<Appointment>, StoreError> {
        let result = sqlx::query(
            "UPDATE appointments SET
                 client_id = $2, recipient_id = $3, property_id = $4,
                 appointment_date = $5, notes = $6, seen_by = $7, status = $8
             WHERE id = $1",
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.client.as_uuid())
        .bind(appointment.recipient.as_uuid())
        .bind(appointment.property.as_uuid())
        .bind(appointment.appointment_date)
        .bind(&appointment.notes)
        .bind(uuids(&appointment.seen_by))
        .bind(appointment.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok((result.rows_affected() > 0).then_some(appointment))
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: RequestStatus,
    ) -> Result<Option<Appointment>, StoreError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Appointment::try_from).transpose()
    }

    async fn mark_appointments_seen(&self, user: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE appointments SET seen_by = array_append(seen_by, $1)
             WHERE (client_id = $1 OR recipient_id = $1)
               AND NOT ($1 = ANY (seen_by))",
        )
        .bind(user.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_unseen_appointments(&self, user: UserId) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM appointments
             WHERE (client_id = $1 OR recipient_id = $1)
               AND status <> 'cancelled'
               AND NOT ($1 = ANY (seen_by))",
        )
        .bind(user.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count.try_into().unwrap_or(0))
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn clients(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn clients_by_agent(&self, agent: UserId) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE agent_id = $1 ORDER BY created_at"
        ))
        .bind(agent.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn insert_client(&self, client: Client) -> Result<Client, StoreError> {
        sqlx::query(
            "INSERT INTO clients
                 (id, name, email, phone, notes, agent_id, property_id, status,
                  payment_done, seen_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.notes)
        .bind(client.agent.as_uuid())
        .bind(client.property.map(|p| p.as_uuid()))
        .bind(client.status.as_str())
        .bind(client.payment_done)
        .bind(uuids(&client.seen_by))
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    async fn replace_client(&self, client: Client) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE clients SET
                 name = $2, email = $3, phone = $4, notes = $5, agent_id = $6,
                 property_id = $7, status = $8, payment_done = $9, seen_by = $10,
                 updated_at = now()
             WHERE id = $1
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.notes)
        .bind(client.agent.as_uuid())
        .bind(client.property.map(|p| p.as_uuid()))
        .bind(client.status.as_str())
        .bind(client.payment_done)
        .bind(uuids(&client.seen_by))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Client::try_from).transpose()
    }

    async fn delete_client(&self, id: ClientId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_confirmed_client(
        &self,
        email: &str,
        property: ListingId,
        template: Client,
    ) -> Result<Client, StoreError> {
        let mut tx = self.pool.begin().await?;

        // There may be no row to lock yet, so serialize concurrent upserts
        // for the same key with an advisory transaction lock.
        let key = format!("{email}:{property}");
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients
             WHERE email = $1 AND property_id = $2
             LIMIT 1 FOR UPDATE"
        ))
        .bind(email)
        .bind(property.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let record = if let Some(existing) = existing {
            let row = sqlx::query_as::<_, ClientRow>(&format!(
                "UPDATE clients SET property_id = $2, status = 'confirmed', updated_at = now()
                 WHERE id = $1
                 RETURNING {CLIENT_COLUMNS}"
            ))
            .bind(existing.id)
            .bind(property.as_uuid())
            .fetch_one(&mut *tx)
            .await?;
            Client::try_from(row)?
        } else {
            let row = sqlx::query_as::<_, ClientRow>(&format!(
                "INSERT INTO clients
                     (id, name, email, phone, notes, agent_id, property_id, status,
                      payment_done, seen_by, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 RETURNING {CLIENT_COLUMNS}"
            ))
            .bind(template.id.as_uuid())
            .bind(&template.name)
            .bind(&template.email)
            .bind(&template.phone)
            .bind(&template.notes)
            .bind(template.agent.as_uuid())
            .bind(template.property.map(|p| p.as_uuid()))
            .bind(template.status.as_str())
            .bind(template.payment_done)
            .bind(uuids(&template.seen_by))
            .bind(template.created_at)
            .bind(template.updated_at)
            .fetch_one(&mut *tx)
            .await?;
            Client::try_from(row)?
        };

        tx.commit().await?;
        Ok(record)
    }

    async fn mark_client_seen(
        &self,
        id: ClientId,
        user: UserId,
    ) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE clients SET seen_by = array_append(seen_by, $2)
             WHERE id = $1 AND NOT ($2 = ANY (seen_by))
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        // No row updated: either already seen (fall back to a read) or gone.
        match row {
            Some(row) => Ok(Some(Client::try_from(row)?)),
            None => self.client(id).await,
        }
    }

    async fn mark_clients_seen(&self, agent: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE clients SET seen_by = array_append(seen_by, $1)
             WHERE agent_id = $1 AND NOT ($1 = ANY (seen_by))",
        )
        .bind(agent.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_unseen_clients(&self, agent: UserId) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM clients
             WHERE agent_id = $1 AND NOT ($1 = ANY (seen_by))",
        )
        .bind(agent.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count.try_into().unwrap_or(0))
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
