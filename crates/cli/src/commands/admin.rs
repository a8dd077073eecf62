//! Admin account provisioning.
//!
//! Admin accounts cannot be self-registered through the API; this command
//! is the only way to create one.
//!
//! # Usage
//!
//! ```bash
//! hearth-cli admin create -e admin@example.com -n "Admin Name" -p <password>
//! ```

use chrono::Utc;

use hearth_core::{Email, Role, UserId};
use hearth_server::models::User;
use hearth_server::services::auth::hash_password;
use hearth_server::store::{PgStore, UserStore};

use super::{CliError, connect};

/// Create a new admin account.
///
/// # Errors
///
/// Returns an error for an invalid email, a weak password, a taken email
/// or a database failure.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::Invalid(e.to_string()))?;

    if name.trim().is_empty() {
        return Err(CliError::Invalid("name is required".to_owned()));
    }
    if password.len() < 8 {
        return Err(CliError::Invalid(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash =
        hash_password(password).map_err(|e| CliError::Invalid(e.to_string()))?;

    let pool = connect().await?;
    let store = PgStore::new(pool);

    let user = store
        .insert_user(User {
            id: UserId::generate(),
            name: name.trim().to_owned(),
            email,
            phone: None,
            password_hash,
            role: Role::Admin,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!("Created admin account {} ({})", user.name, user.email);
    Ok(())
}
