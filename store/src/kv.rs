use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::atomic::{FileMode, atomic_write};

/// Failures from durable local storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("storage encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed durable storage, one file per key under one directory.
///
/// The local-storage shape the session and liked-set stores persist into.
/// Reads treat an absent key as `None`; writes go through the atomic
/// temp-file-and-rename path so a crash never leaves a half-written value.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Read a key. Absent keys are `None`; anything else IO-ish is an error.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a key with default permissions.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(atomic_write(
            &self.key_path(key),
            value.as_bytes(),
            FileMode::Default,
        )?)
    }

    /// Write a key with owner-only permissions. For credentials.
    pub fn set_sensitive(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(atomic_write(
            &self.key_path(key),
            value.as_bytes(),
            FileMode::OwnerOnly,
        )?)
    }

    /// Remove a key. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
