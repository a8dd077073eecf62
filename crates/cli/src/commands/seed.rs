//! Seed the database with demo data.
//!
//! Creates two agents, a handful of listings and a pending viewing so a
//! fresh deployment has something to show. Safe to run once against an
//! empty database; reruns fail on the duplicate agent emails.
//!
//! # Usage
//!
//! ```bash
//! hearth-cli seed
//! ```

use chrono::{Duration, Utc};

use hearth_core::{AppointmentId, Email, ListingId, RequestStatus, Role, UserId};
use hearth_server::models::{Appointment, Listing, User};
use hearth_server::services::auth::hash_password;
use hearth_server::store::{AppointmentStore, ListingStore, PgStore, UserStore};

use super::{CliError, connect};

const DEMO_PASSWORD: &str = "hearth-demo";

/// Seed demo users, listings and one appointment.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a record already
/// exists (the demo agent emails are unique).
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;
    let store = PgStore::new(pool);

    let password_hash =
        hash_password(DEMO_PASSWORD).map_err(|e| CliError::Invalid(e.to_string()))?;

    let agent = seed_user(&store, "Greta Vermeer", "greta@hearth.test", &password_hash).await?;
    let buyer = seed_user(&store, "Bram de Wit", "bram@hearth.test", &password_hash).await?;

    let listings = [
        ("Canal-side loft", 420_000.0, "Amsterdam"),
        ("Two-bed garden flat", 285_000.0, "Utrecht"),
        ("Converted warehouse studio", 198_500.0, "Rotterdam"),
    ];

    let mut first_listing = None;
    for (title, price, city) in listings {
        let listing = store
            .insert_listing(Listing {
                id: ListingId::generate(),
                title: title.to_owned(),
                description: Some(format!("{title} in the heart of {city}.")),
                price,
                location: Some(city.to_owned()),
                images: vec![format!(
                    "https://placehold.co/800x600?text={}",
                    title.replace(' ', "+")
                )],
                owner: agent.id,
                views: 0,
                favorites: Vec::new(),
                ratings: Vec::new(),
                rating: 0.0,
            })
            .await?;
        tracing::info!("Seeded listing: {}", listing.title);
        first_listing.get_or_insert(listing);
    }

    if let Some(listing) = first_listing {
        store
            .insert_appointment(Appointment {
                id: AppointmentId::generate(),
                client: buyer.id,
                recipient: agent.id,
                property: listing.id,
                appointment_date: Utc::now() + Duration::days(3),
                notes: Some("First viewing, keys with the agent.".to_owned()),
                seen_by: Vec::new(),
                status: RequestStatus::Pending,
            })
            .await?;
        tracing::info!("Seeded a pending viewing on {}", listing.title);
    }

    tracing::info!(
        "Seed complete. Demo accounts use the password {:?}",
        DEMO_PASSWORD
    );
    Ok(())
}

async fn seed_user(
    store: &PgStore,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, CliError> {
    let user = store
        .insert_user(User {
            id: UserId::generate(),
            name: name.to_owned(),
            email: Email::parse(email).map_err(|e| CliError::Invalid(e.to_string()))?,
            phone: None,
            password_hash: password_hash.to_owned(),
            role: Role::Agent,
            created_at: Utc::now(),
        })
        .await?;
    tracing::info!("Seeded agent: {} <{}>", user.name, user.email);
    Ok(user)
}
