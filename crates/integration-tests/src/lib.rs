//! Integration test helpers for Hearth.
//!
//! The tests in `tests/` exercise a running server over HTTP and are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a server against a disposable store
//! HEARTH_STORE=memory cargo run -p hearth-server &
//!
//! # Run the ignored integration tests
//! cargo test -p hearth-integration-tests -- --ignored
//! ```
//!
//! `HEARTH_BASE_URL` overrides the default server address.

use serde_json::{Value, json};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("HEARTH_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// A registered account and its bearer token.
pub struct TestAccount {
    pub token: String,
    pub user: Value,
}

/// Register a fresh agent with a unique email and return its credential.
///
/// # Errors
///
/// Returns an error when the server is unreachable or registration fails.
pub async fn register_agent(
    client: &reqwest::Client,
    name: &str,
) -> Result<TestAccount, reqwest::Error> {
    let email = format!("{}-{}@hearth.test", name, uuid::Uuid::new_v4());
    let body: Value = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": name,
            "email": email,
            "password": "integration-password",
            "role": "agent",
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(TestAccount {
        token: body["token"].as_str().unwrap_or_default().to_owned(),
        user: body["user"].clone(),
    })
}
