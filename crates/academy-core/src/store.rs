//! Key/value persistence behind the ledgers.
//!
//! A store is built once per process and handed to whatever needs it by
//! reference. Values are whole documents; there is no partial update and the
//! last writer wins.

use crate::error::{AcademyError, Result};
use crate::{io, paths};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Write several keys as one unit where the backend allows it.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One YAML document per key under `<root>/.academy/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a store that must already have been initialized.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        if !paths::academy_dir(&store.root).is_dir() {
            return Err(AcademyError::NotInitialized);
        }
        Ok(store)
    }

    fn path(&self, key: &str) -> PathBuf {
        paths::ledger_path(&self.root, key)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        io::read_optional(&self.path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        io::atomic_write(&self.path(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        io::remove_if_exists(&self.path(key))
    }

    /// Stage every tempfile before renaming any.
    ///
    /// A failure while staging leaves every existing file untouched. A failure
    /// during the rename pass is returned as-is; keys renamed before it keep
    /// their new contents.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = self.path(key);
            let tmp = io::stage(&path, value.as_bytes())?;
            staged.push((path, tmp));
        }
        for (path, tmp) in staged {
            tmp.persist(&path).map_err(|e| e.error)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AcademyError::Storage("memory store poisoned".to_string()))
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ledger helpers
// ---------------------------------------------------------------------------

/// Load a YAML ledger, returning `Ok(None)` when the key was never written.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key)? {
        Some(data) => Ok(Some(serde_yaml::from_str(&data)?)),
        None => Ok(None),
    }
}

/// Load a YAML ledger, degrading to the default on any storage or parse failure.
pub(crate) fn load_or_default<T>(store: &dyn Store, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match load_yaml(store, key) {
        Ok(Some(v)) => v,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "ledger unreadable, using defaults");
            T::default()
        }
    }
}

pub(crate) fn save_yaml<T: serde::Serialize>(store: &dyn Store, key: &str, value: &T) -> Result<()> {
    let data = serde_yaml::to_string(value)?;
    store.set(key, &data)
}
