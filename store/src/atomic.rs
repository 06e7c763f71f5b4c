//! Atomic file writes: temp file in the target directory, fsync, rename.
//!
//! On Windows, rename-over-existing fails, so overwrites fall back to a
//! backup-and-restore dance to avoid losing the previous value.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Permission policy for the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FileMode {
    /// Inherit the default umask.
    #[default]
    Default,
    /// Owner-only read/write (0o600 on Unix). For credential files.
    OwnerOnly,
}

pub(crate) fn atomic_write(path: &Path, bytes: &[u8], mode: FileMode) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    apply_mode(tmp.path(), mode)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // Persist (rename) - handle Windows where rename fails if target exists.
    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;

        if let Err(restore) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(restore.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(
                path = %backup.display(),
                "Failed to remove .bak after atomic write: {e}"
            );
        }
    }

    apply_mode(path, mode)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: FileMode) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if matches!(mode, FileMode::OwnerOnly) {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: FileMode) -> io::Result<()> {
    Ok(())
}
