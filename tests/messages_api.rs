//! Message endpoint validation shapes.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{auth_cookie, test_app, test_token};

fn server() -> TestServer {
    TestServer::new(test_app()).unwrap()
}

#[tokio::test]
async fn test_create_message_rejects_missing_content() {
    let token = test_token(1, "Alice");

    let response = server()
        .post("/messages")
        .add_header("cookie", auth_cookie(&token))
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"errors": [{"path": "content", "message": "Message is required"}]})
    );
}

#[tokio::test]
async fn test_create_message_rejects_whitespace_content() {
    let token = test_token(1, "Alice");

    let response = server()
        .post("/messages")
        .add_header("cookie", auth_cookie(&token))
        .json(&json!({"content": " \t \n "}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_messages_rejects_bad_pagination() {
    let token = test_token(1, "Alice");

    let response = server()
        .get("/messages")
        .add_query_param("page", "0")
        .add_query_param("limit", "nope")
        .add_header("cookie", auth_cookie(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["page", "limit"]);
}

#[tokio::test]
async fn test_list_messages_rejects_oversized_limit() {
    let token = test_token(1, "Alice");

    let response = server()
        .get("/messages")
        .add_query_param("page", "4294967295")
        .add_query_param("limit", "4294967295")
        .add_header("cookie", auth_cookie(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["path"].as_str(), Some("limit"));
}

#[tokio::test]
async fn test_list_messages_rejects_unknown_order_column() {
    let token = test_token(1, "Alice");

    let response = server()
        .get("/messages")
        .add_query_param("orderBy", "id; DROP TABLE messages")
        .add_header("cookie", auth_cookie(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["errors"][0]["path"].as_str(),
        Some("orderBy"),
    );
}
