//! Browser `localStorage` as a blob store.

use fb_core::{BlobStore, PersistError};
use wasm_bindgen::{JsCast, JsValue};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// The window's `localStorage`. Fails outside a browser window or when
    /// storage is disabled (private mode, sandboxed frames).
    pub fn open() -> Result<Self, PersistError> {
        let window =
            web_sys::window().ok_or_else(|| PersistError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| PersistError::Storage("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl BlobStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        // quota errors surface here as a DOMException
        self.storage.set_item(key, value).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> PersistError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    PersistError::Storage(message)
}
