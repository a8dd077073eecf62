//! End-to-end API tests against a running server.
//!
//! All tests are `#[ignore]`d; see the crate docs for how to run them.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use hearth_integration_tests::{base_url, register_agent};

#[tokio::test]
#[ignore = "Requires running server"]
async fn health_endpoints_respond() {
    let client = Client::new();

    let live = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("request");
    assert_eq!(live.status(), StatusCode::OK);

    let ready = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("request");
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn register_login_and_profile_round_trip() {
    let client = Client::new();
    let account = register_agent(&client, "roundtrip").await.expect("register");

    let profile: Value = client
        .get(format!("{}/api/auth/user", base_url()))
        .bearer_auth(&account.token)
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status")
        .json()
        .await
        .expect("json");

    assert_eq!(profile["id"], account.user["id"]);
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn unauthenticated_mutations_are_rejected() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/listings", base_url()))
        .json(&json!({ "title": "x", "price": 1.0, "images": ["a"] }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn listing_lifecycle_and_view_counting() {
    let client = Client::new();
    let agent = register_agent(&client, "lister").await.expect("register");

    let listing: Value = client
        .post(format!("{}/api/listings", base_url()))
        .bearer_auth(&agent.token)
        .json(&json!({
            "title": "Integration loft",
            "price": 123_000.0,
            "images": ["https://img.example/1.png"],
        }))
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status")
        .json()
        .await
        .expect("json");

    let id = listing["id"].as_str().expect("id");

    // Two detail fetches count two views; the list endpoint counts none.
    for _ in 0..2 {
        client
            .get(format!("{}/api/listings/{id}", base_url()))
            .send()
            .await
            .expect("request")
            .error_for_status()
            .expect("status");
    }

    let detail: Value = client
        .get(format!("{}/api/listings/{id}", base_url()))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(detail["views"], 3);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn confirming_a_viewing_creates_a_pipeline_client() {
    let client = Client::new();
    let owner = register_agent(&client, "owner").await.expect("register");
    let buyer = register_agent(&client, "buyer").await.expect("register");

    let listing: Value = client
        .post(format!("{}/api/listings", base_url()))
        .bearer_auth(&owner.token)
        .json(&json!({
            "title": "Pipeline test flat",
            "price": 95_000.0,
            "images": ["https://img.example/2.png"],
        }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    let appointment: Value = client
        .post(format!("{}/api/appointments", base_url()))
        .bearer_auth(&buyer.token)
        .json(&json!({
            "property": listing["id"],
            "appointment_date": "2026-09-01T10:00:00Z",
        }))
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status")
        .json()
        .await
        .expect("json");

    let change: Value = client
        .patch(format!(
            "{}/api/appointments/{}/status",
            base_url(),
            appointment["id"].as_str().expect("id")
        ))
        .bearer_auth(&owner.token)
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status")
        .json()
        .await
        .expect("json");

    assert_eq!(change["appointment"]["status"], "confirmed");
    assert_eq!(change["client"]["status"], "confirmed");
    assert_eq!(change["client"]["payment_done"], false);
    assert_eq!(change["client"]["agent"]["id"], owner.user["id"]);

    // The record shows up in the owner's pipeline.
    let pipeline: Value = client
        .get(format!("{}/api/clients", base_url()))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    let records = pipeline.as_array().expect("array");
    assert!(
        records
            .iter()
            .any(|r| r["id"] == change["client"]["id"])
    );
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn notification_counts_drop_after_mark_all_seen() {
    let client = Client::new();
    let owner = register_agent(&client, "badges").await.expect("register");
    let buyer = register_agent(&client, "booker").await.expect("register");

    let listing: Value = client
        .post(format!("{}/api/listings", base_url()))
        .bearer_auth(&owner.token)
        .json(&json!({
            "title": "Badge bungalow",
            "price": 77_000.0,
            "images": ["https://img.example/3.png"],
        }))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    client
        .post(format!("{}/api/appointments", base_url()))
        .bearer_auth(&buyer.token)
        .json(&json!({
            "property": listing["id"],
            "appointment_date": "2026-09-02T14:00:00Z",
        }))
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status");

    let before: Value = client
        .get(format!("{}/api/notifications/counts", base_url()))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert!(before["new_appointments"].as_u64().expect("count") >= 1);

    client
        .post(format!("{}/api/appointments/markAllSeen", base_url()))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("request")
        .error_for_status()
        .expect("status");

    let after: Value = client
        .get(format!("{}/api/notifications/counts", base_url()))
        .bearer_auth(&owner.token)
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(after["new_appointments"], 0);
}
