//! Durable key-value storage used to persist the session across reloads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Failures reported by a storage backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be reached at all (no window, storage disabled).
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation (quota, security policy).
    #[error("storage operation failed: {0}")]
    Backend(String),
}

/// String key-value storage that survives page reloads.
pub trait KeyValueStorage {
    /// Reads `key`; `Ok(None)` when it is absent.
    ///
    /// # Errors
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] when the backend refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns a [`StorageError`] when the backend refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same map, so a second store built
/// from a clone sees what the first one wrote, the way a reloaded page sees
/// `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// The browser's `localStorage`, read and written as raw strings.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn raw() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::raw()?
            .get_item(key)
            .map_err(|err| StorageError::Backend(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::raw()?
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(format!("{err:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::raw()?
            .remove_item(key)
            .map_err(|err| StorageError::Backend(format!("{err:?}")))
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn browser_storage_roundtrip() {
        let storage = BrowserStorage;
        storage.set("coursehub-test", "value").unwrap();
        assert_eq!(
            storage.get("coursehub-test").unwrap(),
            Some("value".to_string())
        );
        storage.remove("coursehub-test").unwrap();
        assert_eq!(storage.get("coursehub-test").unwrap(), None);
    }
}
