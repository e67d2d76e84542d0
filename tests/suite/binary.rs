//! Runs the `anonboard` binary against a mock board API.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;

use crate::common::{mount_success, mount_threads, start_board, thread_json};

/// Run the binary on the blocking pool so the mock server keeps serving.
async fn anonboard(home: &Path, api_url: Option<&str>, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_anonboard"));
    command
        .env("HOME", home)
        .env_remove("ANONBOARD_API_URL")
        .env_remove("RUST_LOG")
        .arg("--identity-file")
        .arg(home.join("randomUserId"))
        .args(args);
    if let Some(url) = api_url {
        command.env("ANONBOARD_API_URL", url);
    }
    tokio::task::spawn_blocking(move || command.output().expect("binary runs"))
        .await
        .expect("blocking task")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn whoami_without_identity() {
    let home = tempfile::tempdir().unwrap();

    let output = anonboard(home.path(), None, &["whoami"]).await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Not signed in."));
}

#[tokio::test]
async fn threads_requires_an_identity() {
    let home = tempfile::tempdir().unwrap();

    let output = anonboard(home.path(), Some("http://127.0.0.1:9"), &["threads"]).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not signed in"));
}

#[tokio::test]
async fn register_then_list_threads() {
    let server = start_board().await;
    mount_success(&server, "register_user.php", json!({"randomUserId": "U1abcdefgh"}), 1).await;
    // One fetch after registration lands on home, one for `threads`.
    mount_threads(
        &server,
        vec![thread_json(4, "Welcome", "2024-05-01 10:00:00")],
        2,
    )
    .await;
    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();

    let registered = anonboard(
        home.path(),
        Some(&uri),
        &["register", "--email", "me@example.com", "--password", "secret1"],
    )
    .await;
    assert!(registered.status.success(), "{registered:?}");
    assert!(stdout(&registered).contains("Signed in as U1abcdef..."));
    assert_eq!(
        std::fs::read_to_string(home.path().join("randomUserId")).unwrap(),
        "U1abcdefgh"
    );

    let listed = anonboard(home.path(), Some(&uri), &["threads"]).await;
    assert!(listed.status.success(), "{listed:?}");
    assert!(stdout(&listed).contains("Welcome"));
}

#[tokio::test]
async fn logout_clears_the_slot() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("randomUserId"), "U1").unwrap();

    let output = anonboard(home.path(), None, &["logout"]).await;

    assert!(output.status.success());
    assert!(!home.path().join("randomUserId").exists());
}

#[tokio::test]
async fn unconfigured_api_fails_the_command() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("randomUserId"), "U1").unwrap();

    let output = anonboard(home.path(), None, &["threads"]).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not configured"));
}
