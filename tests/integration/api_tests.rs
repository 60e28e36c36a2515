//! API integration tests
//!
//! These run against a live server started with `RUN_MODE=development`,
//! which loads the seed data from `seeds/test_data.sql`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080";

const JOHN_DOE_ID: &str = "f0d9bdfc-38e7-4a34-b07f-8216574efbb5";
const JANE_SMITH_ID: &str = "ccc5848f-b32f-44b5-86f1-b51aac112be0";
const EFFECTIVE_JAVA_ID: &str = "2decc0bd-9730-4145-b18e-94029dfb961f";

/// Title unique to one test run, so repeated runs do not merge copies
fn unique_title(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{} {}", prefix, &suffix[..8])
}

async fn add_book(client: &Client, title: &str, amount: i32) -> Value {
    let response = client
        .post(format!("{}/v1/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "amount": amount
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("Failed to parse response")
}

async fn create_user(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/v1/users", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
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
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_get_seeded_user() {
    let client = Client::new();

    let response = client
        .get(format!("{}/v1/users/{}", BASE_URL, JOHN_DOE_ID))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["membershipDate"], "2024-08-13");
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_user() {
    let client = Client::new();

    let response = client
        .get(format!("{}/v1/users/{}", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errorCode"], 404);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_create_user_location() {
    let client = Client::new();

    let response = client
        .post(format!("{}/v1/users", BASE_URL))
        .json(&json!({ "name": "Ada Lovelace" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("No Location header");
    assert!(location.contains("/v1/users/"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(location.ends_with(body["id"].as_str().expect("No id")));
}

#[tokio::test]
#[ignore]
async fn test_create_user_invalid_name() {
    let client = Client::new();

    let response = client
        .post(format!("{}/v1/users", BASE_URL))
        .json(&json!({ "name": "john" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errorCode"], 400);
    assert!(body["details"]["name"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_add_same_book_twice_merges_copies() {
    let client = Client::new();
    let title = unique_title("Merged");

    let first = add_book(&client, &title, 2).await;
    let second = add_book(&client, &title, 3).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["amount"], 5);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_book() {
    let client = Client::new();
    let book = add_book(&client, &unique_title("Lending"), 1).await;
    let user = create_user(&client, "Grace Hopper").await;
    let book_id = book["id"].as_str().expect("No book id");
    let user_id = user["id"].as_str().expect("No user id");
    let loan_url = format!("{}/v1/users/{}/books/{}", BASE_URL, user_id, book_id);

    let response = client.put(&loan_url).send().await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    // The only copy is now out
    let book: Value = client
        .get(format!("{}/v1/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["amount"], 0);

    // Same loan twice
    let response = client.put(&loan_url).send().await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Deleting a held book or its holder is refused
    let response = client
        .delete(format!("{}/v1/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .delete(format!("{}/v1/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client.delete(&loan_url).send().await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("{}/v1/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_borrow_without_copies_left() {
    let client = Client::new();
    let book = add_book(&client, &unique_title("Scarce"), 1).await;
    let book_id = book["id"].as_str().expect("No book id");
    let first = create_user(&client, "Alan Turing").await;
    let second = create_user(&client, "Edsger Dijkstra").await;

    let response = client
        .put(format!(
            "{}/v1/users/{}/books/{}",
            BASE_URL,
            first["id"].as_str().expect("No user id"),
            book_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put(format!(
            "{}/v1/users/{}/books/{}",
            BASE_URL,
            second["id"].as_str().expect("No user id"),
            book_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_books_borrowed_by_user_name() {
    let client = Client::new();

    let response = client
        .get(format!("{}/v1/users/John Doe/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["userName"], "John Doe");
    let books = body["books"].as_array().expect("No books");
    assert!(books.iter().any(|b| b["id"] == EFFECTIVE_JAVA_ID));
    assert!(books.iter().all(|b| b.get("amount").is_none()));
}

#[tokio::test]
#[ignore]
async fn test_user_without_books_cannot_be_listed() {
    let client = Client::new();

    let response = client
        .get(format!("{}/v1/users/Nobody Known/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_borrowed_books_counts() {
    let client = Client::new();

    let response = client
        .get(format!("{}/v1/books/borrowed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let effective_java = body
        .as_array()
        .expect("Not an array")
        .iter()
        .find(|b| b["id"] == EFFECTIVE_JAVA_ID)
        .expect("Seeded loan missing");
    assert!(effective_java["amount"].as_i64().unwrap_or(0) >= 1);
}

#[tokio::test]
#[ignore]
async fn test_unknown_user_cannot_borrow() {
    let client = Client::new();

    let response = client
        .put(format!(
            "{}/v1/users/{}/books/{}",
            BASE_URL,
            Uuid::new_v4(),
            EFFECTIVE_JAVA_ID
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_rename_user_without_books() {
    let client = Client::new();
    let user = create_user(&client, "Temp Member").await;
    let user_id = user["id"].as_str().expect("No user id");

    let response = client
        .put(format!("{}/v1/users/{}", BASE_URL, user_id))
        .json(&json!({ "name": "Renamed Member" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed Member");
    assert_eq!(body["membershipDate"], user["membershipDate"]);

    let response = client
        .delete(format!("{}/v1/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Seeded member without loans stays untouched
    let response = client
        .get(format!("{}/v1/users/{}", BASE_URL, JANE_SMITH_ID))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

/// Borrow limit the server runs with, e.g. `LIBRARY_LIBRARY__MAX_BOOKS_PER_USER=2`
fn max_books_per_user() -> usize {
    std::env::var("LIBRARY_LIBRARY__MAX_BOOKS_PER_USER")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
}

#[tokio::test]
#[ignore]
async fn test_borrow_limit_is_enforced() {
    let client = Client::new();
    let limit = max_books_per_user();
    let user = create_user(&client, "Barbara Liskov").await;
    let user_id = user["id"].as_str().expect("No user id").to_string();

    for _ in 0..limit {
        let book = add_book(&client, &unique_title("Allowed"), 1).await;
        let response = client
            .put(format!(
                "{}/v1/users/{}/books/{}",
                BASE_URL,
                user_id,
                book["id"].as_str().expect("No book id")
            ))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let extra = add_book(&client, &unique_title("Over Limit"), 1).await;
    let extra_id = extra["id"].as_str().expect("No book id");
    let response = client
        .put(format!("{}/v1/users/{}/books/{}", BASE_URL, user_id, extra_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The refused loan left the shelf untouched
    let extra: Value = client
        .get(format!("{}/v1/books/{}", BASE_URL, extra_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(extra["amount"], 1);
}

#[tokio::test]
#[ignore]
async fn test_add_copies_beyond_counter_capacity() {
    let client = Client::new();
    let title = unique_title("Big Book");

    let full = add_book(&client, &title, i32::MAX).await;
    assert_eq!(full["amount"], i32::MAX);

    let response = client
        .post(format!("{}/v1/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "amount": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errorCode"], 409);
}
