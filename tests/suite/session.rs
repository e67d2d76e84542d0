//! Identity persistence across simulated reloads.

use board_session::{IdentityStore, SessionManager};
use board_types::{Identity, SessionState};

use crate::common::file_store;

fn id(raw: &str) -> Identity {
    Identity::new(raw).expect("identity")
}

#[test]
fn prepopulated_slot_resolves_to_its_token() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(crate::common::SLOT_FILE), "abc123").unwrap();

    let mut manager = SessionManager::new(file_store(dir.path()));
    assert!(manager.state().resolving);
    manager.resolve();

    assert_eq!(manager.state(), SessionState::resolved(Some(id("abc123"))));
}

#[test]
fn identity_tracks_the_latest_set_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = SessionManager::new(file_store(dir.path()));
    manager.resolve();

    let sequence = [Some("A"), None, Some("B"), Some("C"), None, Some("D")];
    for step in sequence {
        let identity = step.map(id);
        manager.set_identity(identity.clone());
        assert_eq!(manager.state().identity, identity);
        assert_eq!(file_store(dir.path()).read(), identity);
    }
}

#[test]
fn logout_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = SessionManager::new(file_store(dir.path()));
    first.resolve();
    first.set_identity(Some(id("U1")));
    first.set_identity(None);

    let mut reloaded = SessionManager::new(file_store(dir.path()));
    reloaded.resolve();

    assert_eq!(reloaded.state(), SessionState::resolved(None));
    assert!(!dir.path().join(crate::common::SLOT_FILE).exists());
}

#[test]
fn login_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = SessionManager::new(file_store(dir.path()));
    first.resolve();
    first.set_identity(Some(id("U1")));

    let mut reloaded = SessionManager::new(file_store(dir.path()));

    assert_eq!(reloaded.resolve(), Some(&id("U1")));
}
