//! Memory store persistence
//!
//! The store is the system of record, so failures here are surfaced as
//! [`AvaError::Persistence`] rather than masked. File writes go to a sibling
//! temp file first and are renamed into place.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AvaError, Result};
use crate::memory::store::MemoryStore;

/// Load/save collaborator for the memory store
pub trait StoreBackend {
    /// Read the current store
    fn load(&self) -> Result<MemoryStore>;

    /// Durably replace the stored state
    fn save(&self, store: &MemoryStore) -> Result<()>;

    /// Human-readable location, for status output
    fn describe(&self) -> String;
}

/// JSON file backend (`databank.json`)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "databank.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Delete the store file if present
    pub fn delete(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|e| AvaError::persistence(&self.path, e))?;
        Ok(true)
    }
}

impl StoreBackend for JsonFileStore {
    fn load(&self) -> Result<MemoryStore> {
        if !self.path.exists() {
            return Ok(MemoryStore::default());
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| AvaError::persistence(&self.path, format!("read failed: {}", e)))?;

        serde_json::from_str(&json)
            .map_err(|e| AvaError::persistence(&self.path, format!("corrupt store: {}", e)))
    }

    fn save(&self, store: &MemoryStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AvaError::persistence(&self.path, format!("cannot create directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(store)
            .map_err(|e| AvaError::persistence(&self.path, format!("serialize failed: {}", e)))?;

        let temp = self.temp_path();
        fs::write(&temp, json)
            .map_err(|e| AvaError::persistence(&temp, format!("write failed: {}", e)))?;
        fs::rename(&temp, &self.path)
            .map_err(|e| AvaError::persistence(&self.path, format!("rename failed: {}", e)))?;

        tracing::debug!(path = %self.path.display(), "memory store saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process backend holding a serialized snapshot
///
/// Goes through the same serde round trip as the file backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: RefCell<Option<String>>,
    saves: RefCell<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing store
    pub fn with_store(store: &MemoryStore) -> Result<Self> {
        let backend = Self::new();
        *backend.snapshot.borrow_mut() = Some(serde_json::to_string(store)?);
        Ok(backend)
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StoreBackend for InMemoryStore {
    fn load(&self) -> Result<MemoryStore> {
        match self.snapshot.borrow().as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| AvaError::persistence("<memory>", format!("corrupt store: {}", e))),
            None => Ok(MemoryStore::default()),
        }
    }

    fn save(&self, store: &MemoryStore) -> Result<()> {
        let json = serde_json::to_string(store)
            .map_err(|e| AvaError::persistence("<memory>", format!("serialize failed: {}", e)))?;
        *self.snapshot.borrow_mut() = Some(json);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
