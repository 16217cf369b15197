//! Key-value persistence for session state.
//!
//! The option set is persisted under a single key on every mutation and
//! restored at panel open. The surface is synchronous: a mutation must be
//! durable before observers run and before any remote push is issued.
//! Two implementations ship: an in-memory map and a JSON file written
//! atomically via a temp-file rename.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Store key holding the serialized generation option set.
pub const OPTIONS_KEY: &str = "advancedOptions";

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized or parsed.
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous key-value persistence with `get`/`set`.
pub trait KvStore: Send + Sync {
    /// The value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}

/* --------------------------------------------------------------------------
   In-memory store
   -------------------------------------------------------------------------- */

/// Map-backed store for tests and embeddings that bring their own
/// persistence.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   JSON file store
   -------------------------------------------------------------------------- */

/// File-backed store: one JSON object per file, keys at the top level.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole backing object; a missing file is an empty store.
    fn read_map(&self) -> Result<HashMap<String, serde_json::Value>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let mut map = self.read_map()?;
        Ok(map.remove(key))
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);

        // Write the sibling temp file first, then rename over the target,
        // so a reader never sees a torn write.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
