//! Durable storage for the dashboard collection.
//!
//! Storage holds opaque serialized text under fixed keys and is written only
//! by the store, always as a whole-document overwrite. Failures never cross
//! the store's public operations — callers log and continue.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Keyed text storage. `read` of an unknown key yields `Ok(None)`, never an
/// error — absent and unreadable are distinct for logging only.
pub trait DurableStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError>;
}

// ─── In-memory storage ───────────────────────────────────────────────────

/// Volatile storage for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, e.g. with a persisted collection fixture.
    pub fn seeded(key: &str, payload: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), payload.to_string());
        storage
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

// ─── File-backed storage ─────────────────────────────────────────────────

/// One JSON document per key under a root directory — the localStorage
/// analogue for a desktop host.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), payload)?;
        Ok(())
    }
}
