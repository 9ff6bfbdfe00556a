//! Storage layer for todo
//!
//! A durable key-value store holding one JSON document per key, plus the
//! `Persistence` adapter that reads and writes the task collection under a
//! single fixed key.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/
//!   .todo.lock              # Session lock held by mutating CLI commands
//!   todo-tasks.json         # JSON array of tasks (key "todo-tasks")
//!   todo-tasks.json.lock    # Per-key write lock
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Task;

/// Storage key holding the task collection
pub const DEFAULT_STORAGE_KEY: &str = "todo-tasks";

/// Default per-key quota, matching a typical browser local-storage budget
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Name of the session lock file inside the data directory
pub const SESSION_LOCK_FILE: &str = ".todo.lock";

/// A durable string-keyed store of string values
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

fn check_quota(key: &str, value: &str, quota_bytes: Option<u64>) -> Result<()> {
    let size = value.len() as u64;
    match quota_bytes {
        Some(limit) if size > limit => Err(Error::QuotaExceeded {
            key: key.to_string(),
            size,
            limit,
        }),
        _ => Ok(()),
    }
}

// =========================================================================
// File-backed store
// =========================================================================

/// Key-value store keeping each key in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Set the per-key byte quota (`None` disables it)
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Path of the session lock file
    pub fn session_lock_path(&self) -> PathBuf {
        self.dir.join(SESSION_LOCK_FILE)
    }

    /// Acquire the session lock guarding a load/mutate/save sequence
    pub fn lock_session(&self) -> Result<FileLock> {
        FileLock::acquire(self.session_lock_path(), self.lock_timeout_ms)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(key, value, self.quota_bytes)?;
        lock::write_atomic_locked(self.path_for(key), value.as_bytes(), self.lock_timeout_ms)
    }
}

// =========================================================================
// In-memory store
// =========================================================================

/// Key-value store held entirely in memory
///
/// Writes can be made to fail on demand, which stands in for an unavailable
/// or full backing store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<u64>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Make every subsequent `set` fail (or succeed again)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Seed a raw value without quota checks
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "storage unavailable",
            )));
        }
        check_quota(key, value, self.quota_bytes)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =========================================================================
// Task collection persistence
// =========================================================================

/// Reads and writes the task collection as a JSON array under one key
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load the collection, distinguishing corrupt data from absence
    ///
    /// An absent key yields an empty collection. A value that does not parse
    /// as a task array yields `Error::PersistenceReadCorrupt`.
    pub fn try_load(&self) -> Result<Vec<Task>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|err| Error::PersistenceReadCorrupt {
            key: self.key.clone(),
            reason: err.to_string(),
        })
    }

    /// Load the collection, falling back to empty on any failure
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => {
                tracing::debug!(key = %self.key, count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "starting with an empty task list");
                Vec::new()
            }
        }
    }

    /// Write the full collection
    ///
    /// Any store failure is reported as `Error::PersistenceWriteFailed`.
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.store
            .set(&self.key, &json)
            .map_err(|err| Error::PersistenceWriteFailed {
                key: self.key.clone(),
                reason: err.to_string(),
            })?;
        tracing::debug!(key = %self.key, count = tasks.len(), bytes = json.len(), "saved tasks");
        Ok(())
    }
}
