//! Persistence gateway: the form collection as one JSON blob in a key-value store.
//!
//! Failures never reach the editor. `load` falls back to an empty collection
//! and `save` gives up quietly; both log a warning. In-memory state stays the
//! source of truth.

use crate::form::FormDefinition;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

/// Storage key used when the settings do not override it.
pub const DEFAULT_STORAGE_KEY: &str = "vue-form-builder-forms";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A string-valued key-value store (browser `localStorage`, a directory, memory).
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

// ─── Backends ────────────────────────────────────────────────────────────

/// In-memory store. Clones share the same map, so a caller can keep a handle
/// to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, as when the storage quota is exhausted.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw value, bypassing `fail_writes`.
    pub fn insert(&self, key: &str, value: &str) {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(PersistError::Storage("quota exceeded".to_string()));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// ─── Repository ──────────────────────────────────────────────────────────

/// Loads and saves the whole form collection under a single key.
pub struct FormRepository {
    store: Box<dyn BlobStore>,
    key: String,
}

impl FormRepository {
    pub fn new(store: impl BlobStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            key: key.into(),
        }
    }

    /// Repository over a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBlobStore::new(), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load every stored form. Absent or corrupt data yields an empty list.
    pub fn load(&self) -> Vec<FormDefinition> {
        match self.try_load() {
            Ok(forms) => forms,
            Err(e) => {
                log::warn!("Failed to load forms from `{}`: {e}", self.key);
                Vec::new()
            }
        }
    }

    /// Load every stored form, repairing element positions that are not a
    /// dense `0..len` ranking.
    pub fn try_load(&self) -> Result<Vec<FormDefinition>, PersistError> {
        let Some(text) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut forms: Vec<FormDefinition> = serde_json::from_str(&text)?;
        for form in &mut forms {
            if form.elements.normalize() {
                log::warn!("Re-ranked element positions of form {}", form.id);
            }
        }
        Ok(forms)
    }

    /// Best-effort save. Returns whether the write landed.
    pub fn save(&mut self, forms: &[FormDefinition]) -> bool {
        match self.try_save(forms) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save forms to `{}`: {e}", self.key);
                false
            }
        }
    }

    pub fn try_save(&mut self, forms: &[FormDefinition]) -> Result<(), PersistError> {
        let text = serde_json::to_string(forms)?;
        self.store.set(&self.key, &text)
    }
}
