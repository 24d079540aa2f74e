//! In-memory storage.

use super::{Storage, StorageError, StorageResult};
use crate::document::BoardDocument;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage for tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, BoardDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, HashMap<String, BoardDocument>>> {
        self.documents
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, HashMap<String, BoardDocument>>> {
        self.documents
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {e}")))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &BoardDocument) -> StorageResult<()> {
        self.write()?.insert(id.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<BoardDocument> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        self.write()?.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut ids: Vec<String> = self.read()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.read()?.contains_key(id))
    }
}
