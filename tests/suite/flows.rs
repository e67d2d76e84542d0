//! End-to-end flows through the engine against a mock board API.

use board_engine::{CredentialsInput, Engine, Event, LoadState, Notice, Route, View};
use board_session::{IdentityStore, MemoryIdentityStore};
use board_types::{Field, Identity, ThreadId};
use serde_json::json;

use crate::common::{
    engine_for, file_store, forbid_post, mount_app_error, mount_posts, mount_success,
    mount_threads, post_json, start_board, thread_json, unconfigured_client,
};

fn signed_in() -> MemoryIdentityStore {
    MemoryIdentityStore::with_identity(Identity::new("U1").unwrap())
}

#[tokio::test]
async fn registration_success_persists_identity() {
    let server = start_board().await;
    mount_success(&server, "register_user.php", json!({"randomUserId": "U1", "id": 1}), 1).await;
    mount_threads(&server, vec![], 1).await;

    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_for(&server, file_store(dir.path())).await;
    engine.dispatch(Event::Navigate(Route::Register)).await;
    engine
        .dispatch(Event::SubmitRegister(CredentialsInput::new(
            "new@example.com",
            "secret1",
        )))
        .await;

    assert_eq!(
        engine.session_state().identity,
        Some(Identity::new("U1").unwrap())
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join(crate::common::SLOT_FILE)).unwrap(),
        "U1"
    );
    assert_eq!(engine.controller().route(), Some(Route::Home));
}

#[tokio::test]
async fn duplicate_email_leaves_identity_unchanged() {
    let server = start_board().await;
    mount_app_error(
        &server,
        "register_user.php",
        409,
        "EMAIL_ALREADY_EXISTS",
        "Duplicate entry",
    )
    .await;

    let store = signed_in();
    let mut engine = engine_for(&server, store.clone()).await;
    engine.dispatch(Event::Navigate(Route::Register)).await;
    engine
        .dispatch(Event::SubmitRegister(CredentialsInput::new(
            "taken@example.com",
            "secret1",
        )))
        .await;

    assert_eq!(store.read(), Some(Identity::new("U1").unwrap()));
    let View::Register(form) = engine.view() else {
        panic!("expected to stay on registration");
    };
    assert_eq!(
        form.notice,
        Some(Notice::Error(
            "This email address is already registered.".to_string()
        ))
    );
    assert!(form.field_error(Field::Email).is_some());
}

#[tokio::test]
async fn overlong_title_never_reaches_the_network() {
    let server = start_board().await;
    mount_threads(&server, vec![thread_json(1, "first", "2024-05-01 10:00:00")], 1).await;
    forbid_post(&server, "create_thread.php").await;

    let mut engine = engine_for(&server, signed_in()).await;
    engine.dispatch(Event::Navigate(Route::Home)).await;
    engine
        .dispatch(Event::SubmitThread {
            title: "x".repeat(101),
        })
        .await;

    let View::Home(home) = engine.view() else {
        panic!("expected home");
    };
    assert!(home.composer.notice.as_ref().is_some_and(Notice::is_error));
    assert_eq!(home.threads.loaded().map(Vec::len), Some(1));
}

#[tokio::test]
async fn created_thread_appears_after_single_refetch() {
    let server = start_board().await;
    mount_success(
        &server,
        "create_thread.php",
        json!({"threadId": 2, "message": "Thread created."}),
        1,
    )
    .await;
    // Mount fetch plus exactly one re-fetch.
    mount_threads(
        &server,
        vec![
            thread_json(2, "second", "2024-05-02 10:00:00"),
            thread_json(1, "first", "2024-05-01 10:00:00"),
        ],
        2,
    )
    .await;

    let mut engine = engine_for(&server, signed_in()).await;
    engine.dispatch(Event::Navigate(Route::Home)).await;
    engine
        .dispatch(Event::SubmitThread {
            title: "  second  ".to_string(),
        })
        .await;

    let View::Home(home) = engine.view() else {
        panic!("expected home");
    };
    assert_eq!(
        home.composer.notice,
        Some(Notice::Success("Thread created.".to_string()))
    );
    assert!(home.composer.draft.is_empty());
    assert_eq!(home.threads.loaded().map(Vec::len), Some(2));
}

#[tokio::test]
async fn reply_refetches_posts_once_and_orders_newest_first() {
    let server = start_board().await;
    mount_success(&server, "create_post_to_thread.php", json!({}), 1).await;
    mount_posts(
        &server,
        7,
        "Topic",
        vec![
            post_json(1, "oldest", "2024-05-01 10:00:00"),
            post_json(3, "newest", "2024-05-03 10:00:00"),
            post_json(2, "middle", "2024-05-02 10:00:00"),
        ],
        2,
    )
    .await;

    let mut engine = engine_for(&server, signed_in()).await;
    engine
        .dispatch(Event::Navigate(Route::Thread(ThreadId::new(7))))
        .await;
    engine
        .dispatch(Event::SubmitPost {
            content: "newest".to_string(),
        })
        .await;

    let View::Thread(view) = engine.view() else {
        panic!("expected thread view");
    };
    assert_eq!(view.title.as_deref(), Some("Topic"));
    let contents: Vec<&str> = view
        .posts
        .loaded()
        .expect("posts loaded")
        .iter()
        .map(|p| p.content.as_str())
        .collect();
    assert_eq!(contents, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn unconfigured_api_reports_without_calling() {
    let mut engine = Engine::new(signed_in(), unconfigured_client());
    engine.resolve_session().await;
    engine.dispatch(Event::Navigate(Route::Home)).await;

    let View::Home(home) = engine.view() else {
        panic!("expected home");
    };
    match &home.threads {
        LoadState::Failed(message) => assert!(message.contains("not configured")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn logout_then_reload_redirects_to_registration() {
    let server = start_board().await;
    mount_threads(&server, vec![], 1).await;

    let store = signed_in();
    let mut engine = engine_for(&server, store.clone()).await;
    engine.dispatch(Event::Navigate(Route::Home)).await;
    engine.dispatch(Event::Logout).await;

    let mut reloaded = engine_for(&server, store).await;
    reloaded.dispatch(Event::Navigate(Route::Home)).await;

    assert_eq!(reloaded.session_state().identity, None);
    assert_eq!(reloaded.controller().route(), Some(Route::Register));
}
