//! Integration tests for customer endpoints.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (sushi migrate)
//! - The API server running (cargo run -p sushi-api)
//!
//! Run with: cargo test -p sushi-integration-tests -- --ignored

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sushi_integration_tests::{client, database, unique_email, url};
use uuid::Uuid;

/// Test helper: create a customer and return its JSON representation.
async fn create_customer(client: &Client, email: &str, addresses: Value) -> Value {
    let resp = client
        .post(url("/api/customers"))
        .json(&json!({
            "name": "Isabel",
            "email": email,
            "password": "hashi-maki",
            "phone": {"number": "11 99999-0000"},
            "addresses": addresses,
        }))
        .send()
        .await
        .expect("Failed to create customer");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse customer")
}

async fn get_customer(client: &Client, id: &str) -> reqwest::Response {
    client
        .get(url(&format!("/api/customers/{id}")))
        .send()
        .await
        .expect("Failed to get customer")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_create_customer_with_phone_and_addresses() {
    let client = client();
    let email = unique_email("isabel");

    let created = create_customer(
        &client,
        &email,
        json!([
            {"number": "10", "street": "Rua A", "neighborhood": "Centro"},
            {"number": "22", "street": "Rua B", "neighborhood": "Jardim"}
        ]),
    )
    .await;

    assert_eq!(created["email"], email);
    assert!(created.get("password").is_none());
    assert_eq!(created["phone"]["number"], "11 99999-0000");
    assert_eq!(created["addresses"].as_array().unwrap().len(), 2);

    let id = created["id"].as_str().unwrap();

    let phone: Value = client
        .get(url(&format!("/api/customers/{id}/phone")))
        .send()
        .await
        .expect("Failed to get phone")
        .json()
        .await
        .unwrap();
    assert_eq!(phone["number"], "11 99999-0000");

    let by_email: Value = client
        .get(url(&format!("/api/customers/by-email?email={}", email.to_uppercase())))
        .send()
        .await
        .expect("Failed to find by email")
        .json()
        .await
        .unwrap();
    assert_eq!(by_email["id"], created["id"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_is_conflict() {
    let client = client();
    let email = unique_email("dup");
    create_customer(&client, &email, json!([])).await;

    let resp = client
        .post(url("/api/customers"))
        .json(&json!({
            "name": "Someone else",
            "email": email,
            "password": "other-password",
            "phone": {"number": "123"},
        }))
        .send()
        .await
        .expect("Failed to post customer");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 409);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_replace_clears_addresses_and_keeps_phone() {
    let client = client();
    let created = create_customer(
        &client,
        &unique_email("replace"),
        json!([{"number": "1", "street": "Old street", "neighborhood": "Old"}]),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let new_email = unique_email("replaced");

    let resp = client
        .put(url("/api/customers"))
        .json(&json!({
            "id": id,
            "name": "Isabel Souza",
            "email": new_email,
            "password": "new-password",
            "phone": {"number": "21 98888-1111"},
            "addresses": [],
        }))
        .send()
        .await
        .expect("Failed to replace customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let replaced: Value = get_customer(&client, id).await.json().await.unwrap();
    assert_eq!(replaced["name"], "Isabel Souza");
    assert_eq!(replaced["email"], new_email);
    assert_eq!(replaced["phone"]["id"], created["phone"]["id"]);
    assert_eq!(replaced["phone"]["number"], "21 98888-1111");
    assert!(replaced["addresses"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_customer_then_not_found() {
    let client = client();
    let created = create_customer(
        &client,
        &unique_email("delete"),
        json!([{"number": "5", "street": "Rua C", "neighborhood": "Vila"}]),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let resp = client
        .delete(url(&format!("/api/customers/{id}")))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(get_customer(&client, id).await.status(), StatusCode::NOT_FOUND);
    for owned in ["phone", "addresses"] {
        let resp = client
            .get(url(&format!("/api/customers/{id}/{owned}")))
            .send()
            .await
            .expect("Failed to get owned entity");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{owned}");
    }

    // Owned rows are gone too, not just unreachable.
    let pool = database().await;
    let customer_id: Uuid = id.parse().unwrap();
    for table in ["sushi.phone", "sushi.address"] {
        let remaining: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE customer_id = $1"))
                .bind(customer_id)
                .fetch_one(&pool)
                .await
                .expect("Failed to count owned rows");
        assert_eq!(remaining, 0, "{table}");
    }

    let again = client
        .delete(url(&format!("/api/customers/{id}")))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_find_by_name_without_match_is_not_found() {
    let resp = client()
        .get(url("/api/customers/find?name=no-such-customer-zzz"))
        .send()
        .await
        .expect("Failed to search customers");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
