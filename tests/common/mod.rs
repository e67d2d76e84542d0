//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use board_client::BoardClient;
use board_config::ApiBase;
use board_engine::Engine;
use board_session::{FileIdentityStore, IdentityStore};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SLOT_FILE: &str = "randomUserId";

/// Start a mock server standing in for the board API.
pub async fn start_board() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> BoardClient {
    let base = ApiBase::parse(&server.uri()).expect("mock server uri is a valid base");
    BoardClient::new(Some(base), Duration::from_secs(5)).expect("client builds")
}

pub fn unconfigured_client() -> BoardClient {
    BoardClient::new(None, Duration::from_secs(5)).expect("client builds")
}

pub fn file_store(dir: &Path) -> FileIdentityStore {
    FileIdentityStore::new(dir.join(SLOT_FILE))
}

/// Engine with its session already resolved.
pub async fn engine_for<S: IdentityStore>(server: &MockServer, store: S) -> Engine<S> {
    let mut engine = Engine::new(store, client_for(server));
    engine.resolve_session().await;
    engine
}

pub fn thread_json(id: u64, title: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "random_user_id": "author-0001",
        "title": title,
        "created_at": created_at,
        "post_count": 0
    })
}

pub fn post_json(id: u64, content: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "random_user_id": "author-0002",
        "content": content,
        "created_at": created_at
    })
}

/// Mount the thread list. `expected` is the exact number of fetches the test allows.
pub async fn mount_threads(server: &MockServer, threads: Vec<Value>, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/get_threads.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "threads": threads
        })))
        .expect(expected)
        .mount(server)
        .await;
}

pub async fn mount_posts(
    server: &MockServer,
    thread_id: u64,
    title: &str,
    posts: Vec<Value>,
    expected: u64,
) {
    Mock::given(method("GET"))
        .and(path("/get_thread_posts.php"))
        .and(query_param("thread_id", thread_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "thread": {"id": thread_id, "title": title},
            "posts": posts
        })))
        .expect(expected)
        .mount(server)
        .await;
}

/// Mount a success envelope with extra payload fields on `POST endpoint`.
pub async fn mount_success(server: &MockServer, endpoint: &str, payload: Value, expected: u64) {
    let mut body = json!({"status": "success"});
    if let (Some(body), Some(extra)) = (body.as_object_mut(), payload.as_object()) {
        body.extend(extra.clone());
    }
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Mount an application error on `POST endpoint`.
pub async fn mount_app_error(
    server: &MockServer,
    endpoint: &str,
    status: u16,
    code: &str,
    message: &str,
) {
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "status": "error",
            "error_code": code,
            "message": message
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Fail the test if `POST endpoint` is ever called.
pub async fn forbid_post(server: &MockServer, endpoint: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
