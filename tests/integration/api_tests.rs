//! API integration tests
//!
//! These run against a live server with an empty-ish database and network
//! access to Open Library.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:3000/api";

/// Unique suffix so repeated runs do not collide on unique columns
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Register a fresh account and return its token
async fn register(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": format!("{}@example.com", unique("reader")),
            "password": "correct horse battery staple",
            "name": "Reader"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse register response");
    body["data"]["token"].as_str().expect("No token in response").to_string()
}

async fn add_book(client: &Client, token: &str, open_library_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/my-library/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "openLibraryId": open_library_id, "price": 100, "notes": "shelf" }))
        .send()
        .await
        .expect("Failed to send add request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("login"));

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let again = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], email.as_str());

    let wrong = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "nope" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_authors_are_listed_by_name() {
    let client = Client::new();
    let token = register(&client).await;
    let suffix = unique("author");

    for name in [format!("zz {}", suffix), format!("aa {}", suffix)] {
        let response = client
            .post(format!("{}/authors", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({ "name": name, "country": "UK" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let duplicate = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("aa {}", suffix) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let body: Value = client
        .get(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data is not a list")
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(body["count"], names.len());
}

#[tokio::test]
#[ignore]
async fn test_library_is_private_and_newest_first() {
    let client = Client::new();
    let owner = register(&client).await;
    let stranger = register(&client).await;

    let first = add_book(&client, &owner, "OL893415W").await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = add_book(&client, &owner, "OL45804W").await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second: Value = second.json().await.expect("Failed to parse response");
    let book_id = second["data"]["id"].as_i64().expect("No book id");

    let duplicate = add_book(&client, &owner, "OL893415W").await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let body: Value = client
        .get(format!("{}/my-library/books", BASE_URL))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["id"], book_id);

    let foreign = client
        .get(format!("{}/my-library/books/{}", BASE_URL, book_id))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let plan = client
        .post(format!("{}/my-library/books/{}/installments", BASE_URL, book_id))
        .bearer_auth(&owner)
        .json(&json!({ "numberOfInstallments": 3 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(plan.status(), StatusCode::CREATED);
    let plan: Value = plan.json().await.expect("Failed to parse response");
    assert_eq!(plan["data"]["installments"][0]["amount"], 33.33);

    let deleted = client
        .delete(format!("{}/my-library/books/{}", BASE_URL, book_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}
