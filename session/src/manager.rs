use board_types::{Identity, SessionState};

use crate::IdentityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Resolving,
    Resolved(Option<Identity>),
}

/// Current identity for one activation of the client.
///
/// Starts `Resolving`, reads the durable slot exactly once in [`resolve`],
/// then tracks the identity in memory. While resolved, the in-memory identity
/// and the durable slot always agree.
///
/// The slot is owned outright. The only way to change it is
/// [`set_identity`], so callers cannot reach the store behind it:
///
/// ```compile_fail
/// use board_session::{IdentityStore, MemoryIdentityStore, SessionManager};
///
/// let manager = SessionManager::new(MemoryIdentityStore::default());
/// manager.store().clear();
/// ```
///
/// [`resolve`]: SessionManager::resolve
/// [`set_identity`]: SessionManager::set_identity
#[derive(Debug)]
pub struct SessionManager<S> {
    store: S,
    phase: Phase,
}

impl<S: IdentityStore> SessionManager<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            phase: Phase::Resolving,
        }
    }

    /// Read the durable slot and leave the resolving state.
    ///
    /// Subsequent calls are no-ops and return the current identity.
    pub fn resolve(&mut self) -> Option<&Identity> {
        if self.phase == Phase::Resolving {
            let identity = self.store.read();
            tracing::debug!(identity = ?identity, "Session resolved");
            self.phase = Phase::Resolved(identity);
        }
        self.identity()
    }

    /// Replace the identity in memory and in the durable slot. `None` logs out.
    ///
    /// Ignored while resolving, so an early call cannot race the initial read.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        if self.phase == Phase::Resolving {
            tracing::warn!("Identity change requested before session resolved; ignoring");
            return;
        }
        match &identity {
            Some(id) => {
                self.store.write(id);
                tracing::info!(identity = ?id, "Identity set");
            }
            None => {
                self.store.clear();
                tracing::info!("Identity cleared");
            }
        }
        self.phase = Phase::Resolved(identity);
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match &self.phase {
            Phase::Resolved(identity) => identity.as_ref(),
            Phase::Resolving => None,
        }
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.phase == Phase::Resolving
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.phase {
            Phase::Resolving => SessionState::resolving(),
            Phase::Resolved(identity) => SessionState::resolved(identity.clone()),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use board_types::{Identity, SessionState};

    use super::SessionManager;
    use crate::{IdentityStore, MemoryIdentityStore};

    fn id(raw: &str) -> Identity {
        Identity::new(raw).unwrap()
    }

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryIdentityStore,
        reads: AtomicUsize,
    }

    impl IdentityStore for CountingStore {
        fn read(&self) -> Option<Identity> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read()
        }

        fn write(&self, identity: &Identity) {
            self.inner.write(identity);
        }

        fn clear(&self) {
            self.inner.clear();
        }
    }

    #[test]
    fn starts_resolving_with_no_identity() {
        let manager = SessionManager::new(MemoryIdentityStore::with_identity(id("U1")));
        assert!(manager.is_resolving());
        assert_eq!(manager.identity(), None);
        assert_eq!(manager.state(), SessionState::resolving());
    }

    #[test]
    fn resolve_reads_slot_exactly_once() {
        let mut manager = SessionManager::new(CountingStore::default());
        manager.store().write(&id("U1"));

        assert_eq!(manager.resolve(), Some(&id("U1")));
        manager.store().clear();
        assert_eq!(manager.resolve(), Some(&id("U1")));

        assert_eq!(manager.store().reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_identity_is_inert_while_resolving() {
        let store = MemoryIdentityStore::new();
        let mut manager = SessionManager::new(store.clone());

        manager.set_identity(Some(id("U1")));

        assert!(manager.is_resolving());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn memory_and_slot_agree_after_every_change() {
        let store = MemoryIdentityStore::new();
        let mut manager = SessionManager::new(store.clone());
        manager.resolve();

        manager.set_identity(Some(id("U1")));
        assert_eq!(manager.identity(), store.read().as_ref());

        manager.set_identity(Some(id("U2")));
        assert_eq!(manager.identity(), Some(&id("U2")));
        assert_eq!(store.read(), Some(id("U2")));

        manager.set_identity(None);
        assert_eq!(manager.identity(), None);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn fresh_manager_over_same_slot_sees_last_write() {
        let store = MemoryIdentityStore::new();
        let mut first = SessionManager::new(store.clone());
        first.resolve();
        first.set_identity(Some(id("U1")));

        let mut reloaded = SessionManager::new(store);
        assert_eq!(reloaded.resolve(), Some(&id("U1")));
    }

    #[test]
    fn logout_then_reload_has_no_identity() {
        let store = MemoryIdentityStore::with_identity(id("U1"));
        let mut first = SessionManager::new(store.clone());
        first.resolve();
        first.set_identity(None);

        let mut reloaded = SessionManager::new(store);
        assert_eq!(reloaded.resolve(), None);
        assert_eq!(reloaded.state(), SessionState::resolved(None));
    }
}
