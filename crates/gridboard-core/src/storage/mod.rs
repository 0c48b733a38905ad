//! Storage abstraction for layout persistence.

mod file;
mod memory;
mod policy;
mod snapshot;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use policy::{LayoutWriter, WritePolicy};
pub use snapshot::{LAYOUT_KEY, LayoutPersistence};

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
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

/// Key-value storage backend.
///
/// Values are opaque strings; callers own the encoding. Every operation
/// completes before returning, so a successful `save` is durable as far as
/// the backend can tell.
pub trait Storage: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Load the value stored under `key`.
    fn load(&self, key: &str) -> StorageResult<String>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// List all stored keys.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}
