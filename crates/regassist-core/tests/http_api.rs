//! Registration HTTP API against a real server

mod common;

use common::TestServer;
use serde_json::{json, Value};
use tempfile::tempdir;

async fn post_json(url: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new().post(url).json(body).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_fetch_on_empty_store() {
    let dir = tempdir().unwrap();
    let server = TestServer::start(dir.path()).await;

    let (status, body) = post_json(&server.url("fetch_all_users"), &json!({})).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "success", "users": []}));
    assert!(!server.data_file.exists());
}

#[tokio::test]
async fn test_register_then_fetch_in_order() {
    let dir = tempdir().unwrap();
    let server = TestServer::start(dir.path()).await;

    let (status, body) = post_json(
        &server.url("store_user_data"),
        &json!({"name": "John Doe", "email": "john@example.com", "dob": "1990-01-01"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "User 'John Doe' registered successfully.");

    post_json(
        &server.url("store_user_data"),
        &json!({"name": "Jane Roe", "email": "jane@example.com", "dob": "1985-05-05"}),
    )
    .await;

    let (_, body) = post_json(&server.url("fetch_all_users"), &json!({})).await;
    assert_eq!(
        body["users"],
        json!([
            {"Name": "John Doe", "email": "john@example.com", "dob": "1990-01-01"},
            {"Name": "Jane Roe", "email": "jane@example.com", "dob": "1985-05-05"}
        ])
    );
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let dir = tempdir().unwrap();
    let server = TestServer::start(dir.path()).await;

    let (status, body) = post_json(
        &server.url("store_user_data"),
        &json!({"name": "John Doe", "email": "john@example.com"}),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Missing name, email, or dob"})
    );
    assert!(!server.data_file.exists());
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let dir = tempdir().unwrap();
    let server = TestServer::start(dir.path()).await;

    let response = reqwest::Client::new()
        .post(server.url("store_user_data"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "error", "message": "Invalid JSON data"}));
}
