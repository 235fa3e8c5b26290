use super::SnapshotStore;
use crate::errors::{Error, Result};
use std::{
    collections::HashMap,
    io,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::debug;

/// A [`SnapshotStore`] kept entirely in memory.
///
/// Writes can be made to fail on demand, which is how the store's all-or-nothing
/// behaviour is tested.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(map),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `write` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the raw value stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl SnapshotStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn write(&self, entries: &[(&str, String)]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Io(io::Error::other("memory store rejected write")));
        }
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        debug!("Memory store wrote {} entries", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key_is_none() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.read("advisers").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_then_read() -> Result<()> {
        let store = MemoryStore::new();
        store
            .write(&[("advisers", "[]".to_string()), ("policies", "[1]".to_string())])
            .await?;
        assert_eq!(store.read("advisers").await?.as_deref(), Some("[]"));
        assert_eq!(store.read("policies").await?.as_deref(), Some("[1]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_entries_untouched() -> Result<()> {
        let store = MemoryStore::with_entries([("advisers", "[]")]);
        store.set_fail_writes(true);

        let result = store.write(&[("advisers", "[{}]".to_string())]).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(store.raw("advisers").as_deref(), Some("[]"));
        Ok(())
    }
}
