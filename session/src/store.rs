use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use board_types::Identity;

/// File name of the identity slot inside the data directory.
pub const IDENTITY_SLOT_FILE: &str = "randomUserId";

const DATA_DIR: &str = "anonboard";

/// Durable storage for at most one identity token.
///
/// Implementations swallow medium failures. A failed read is reported as
/// `None`; a failed write or clear leaves the slot as it was.
pub trait IdentityStore: Send + Sync {
    fn read(&self) -> Option<Identity>;
    fn write(&self, identity: &Identity);
    fn clear(&self);
}

impl<S: IdentityStore + ?Sized> IdentityStore for Arc<S> {
    fn read(&self) -> Option<Identity> {
        (**self).read()
    }

    fn write(&self, identity: &Identity) {
        (**self).write(identity);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// Identity slot backed by a plain-text file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at `<data-local-dir>/anonboard/randomUserId`, if the platform has a data dir.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::data_local_dir().map(|dir| Self::new(dir.join(DATA_DIR).join(IDENTITY_SLOT_FILE)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_read(&self) -> io::Result<Option<Identity>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(Identity::new(raw.trim_end_matches(['\r', '\n'])).ok())
    }
}

impl IdentityStore for FileIdentityStore {
    fn read(&self) -> Option<Identity> {
        match self.try_read() {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Identity slot unreadable: {e}");
                None
            }
        }
    }

    fn write(&self, identity: &Identity) {
        if let Err(e) = board_utils::atomic_write(&self.path, identity.as_str().as_bytes()) {
            tracing::warn!(path = %self.path.display(), "Failed to persist identity: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = board_utils::remove_if_exists(&self.path) {
            tracing::warn!(path = %self.path.display(), "Failed to clear identity: {e}");
        }
    }
}

/// In-process slot. Clones share the same slot, so a fresh manager built over a
/// clone behaves like a reload against the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    slot: Arc<Mutex<Option<Identity>>>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(identity))),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn read(&self) -> Option<Identity> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, identity: &Identity) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Store for environments with no durable medium. Reads are always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedIdentityStore;

impl IdentityStore for DetachedIdentityStore {
    fn read(&self) -> Option<Identity> {
        None
    }

    fn write(&self, _identity: &Identity) {
        tracing::debug!("No durable identity medium; write dropped");
    }

    fn clear(&self) {}
}
