//! Browser localStorage as a `LocalCache`

use board_core::{DomainError, DomainResult, LocalCache};
use wasm_bindgen::JsValue;

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

fn storage_error(e: JsValue) -> DomainError {
    DomainError::StorageUnavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl BrowserStorage {
    /// `window.localStorage`. Fails in contexts where it is blocked.
    pub fn local() -> DomainResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| DomainError::StorageUnavailable("no window".to_string()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(DomainError::StorageUnavailable("localStorage disabled".to_string())),
            Err(e) => Err(storage_error(e)),
        }
    }
}

impl LocalCache for BrowserStorage {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}
