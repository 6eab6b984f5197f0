//! Full-stack scenario against a real Postgres instance.
//!
//! Requires `TEST_DATABASE_URL`; each test returns early when it is not
//! set so the rest of the suite stays runnable without infrastructure.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use chatline::server::build_router;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::{auth_cookie, test_config, test_state_with_config};

fn unique_email(tag: &str) -> String {
    format!("{tag}-{}@example.com", uuid::Uuid::new_v4())
}

async fn database_state() -> Option<chatline::server::AppState> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    let mut config = test_config();
    config.database_url = url;
    let mut state = test_state_with_config(config);
    state.db = pool;
    Some(state)
}

#[tokio::test]
async fn test_register_login_post_and_receive_realtime() {
    let Some(state) = database_state().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let server = TestServer::new(build_router(state.clone())).unwrap();
    let email = unique_email("alice");

    // Register.
    let response = server
        .post("/auth/register")
        .json(&json!({"email": email, "password": "secret1", "name": "Alice"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    let user_id = body["user"]["id"].as_i64().unwrap();
    assert_eq!(body["user"]["email"].as_str(), Some(email.as_str()));

    // Login.
    let response = server
        .post("/auth/login")
        .json(&json!({"email": email, "password": "secret1"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();

    // Profile through the gate.
    let response = server
        .get("/auth/user")
        .add_header("cookie", auth_cookie(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: Value = response.json();
    assert_eq!(profile["id"].as_i64(), Some(user_id));
    assert_eq!(profile["role"], "USER");

    // Connect a realtime client before posting.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ws_state = state.clone();
    tokio::spawn(async move {
        axum::serve(listener, build_router(ws_state)).await.unwrap();
    });
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
        .send(Message::text(json!({ "token": token }).to_string()))
        .await
        .unwrap();
    for _ in 0..50 {
        if !state.hub.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!state.hub.is_empty());

    // Post a message.
    let response = server
        .post("/messages")
        .add_header("cookie", auth_cookie(&token))
        .json(&json!({"content": "hi"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let message: Value = response.json();
    assert_eq!(message["content"], "hi");
    assert_eq!(message["senderId"].as_i64(), Some(user_id));
    assert_eq!(message["receiverId"].as_i64(), Some(user_id));

    // The connected client receives the broadcast.
    let frame = timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("event within deadline")
        .expect("stream open")
        .expect("frame ok");
    let frame: Value = match frame {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected frame: {other:?}"),
    };
    assert_eq!(frame["event"], "new_message");
    assert_eq!(frame["data"]["content"], "hi");
    assert_eq!(frame["data"]["sender"]["id"].as_i64(), Some(user_id));
    assert_eq!(frame["data"]["sender"]["name"], "Alice");

    // The first page holds the newest messages, reversed so the newest is
    // last; the message just posted closes the page.
    let response = server
        .get("/messages")
        .add_header("cookie", auth_cookie(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["pagination"]["page"], 1);
    let data = body["data"].as_array().unwrap();
    let newest = data.last().unwrap();
    assert_eq!(newest["content"], "hi");
    assert_eq!(newest["sender"]["name"], "Alice");
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let Some(state) = database_state().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let server = TestServer::new(build_router(state)).unwrap();
    let email = unique_email("dup");

    let first = server
        .post("/auth/register")
        .json(&json!({"email": email, "password": "secret1"}))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server
        .post("/auth/register")
        .json(&json!({"email": email, "password": "secret1"}))
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = second.json();
    assert_eq!(body, json!({"message": "Email already exists"}));
}
