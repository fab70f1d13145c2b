//! LocalStorage-backed local store

use web_sys::Storage;

use crate::error::StoreError;
use crate::persistence::LocalStore;

pub struct WebStorage {
    storage: Option<Storage>,
}

impl WebStorage {
    /// Window LocalStorage; missing storage (private mode) degrades to a
    /// store that reads nothing and rejects writes
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not persist");
        }
        Self { storage }
    }
}

impl Default for WebStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}
