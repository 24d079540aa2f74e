//! Storage abstraction for persisting [`BoardDocument`]s.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::BoardDocument;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A place boards are saved to and loaded from, keyed by document id.
pub trait Storage: Send + Sync {
    fn save(&self, id: &str, document: &BoardDocument) -> StorageResult<()>;

    /// Load a document; [`StorageError::NotFound`] if there is none.
    fn load(&self, id: &str) -> StorageResult<BoardDocument>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Ids of every stored document, sorted.
    fn list(&self) -> StorageResult<Vec<String>>;

    fn exists(&self, id: &str) -> StorageResult<bool>;
}
