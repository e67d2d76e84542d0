//! Single-file slot persistence.
//!
//! Writes go through a temp file in the destination directory followed by a
//! rename, so a reader never observes a half-written slot.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Atomically replace `path` with `bytes`.
///
/// The result is readable and writable by the owner only (0o600 on Unix).
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    restrict_to_owner(tmp.path())?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        // Rename-over-existing is refused on some platforms.
        if path.exists() {
            fs::remove_file(path)?;
            err.file.persist(path).map_err(|e| e.error)?;
        } else {
            return Err(err.error);
        }
    }

    restrict_to_owner(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Slot persisted");
    Ok(())
}

/// Remove `path`; a missing file is not an error.
pub fn remove_if_exists(path: impl AsRef<Path>) -> io::Result<()> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}
