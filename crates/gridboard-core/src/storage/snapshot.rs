//! Whole-layout snapshots on top of a key-value storage.

use super::{Storage, StorageError, StorageResult};
use crate::widget::Widget;
use std::sync::Arc;

/// Key the layout snapshot is stored under.
pub const LAYOUT_KEY: &str = "gridWidgets";

/// Reads and writes the full widget collection as one JSON array.
pub struct LayoutPersistence<S: Storage + ?Sized> {
    storage: Arc<S>,
    key: String,
}

impl<S: Storage + ?Sized> Clone for LayoutPersistence<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
        }
    }
}

impl<S: Storage + ?Sized> LayoutPersistence<S> {
    /// Persist under [`LAYOUT_KEY`].
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_key(storage, LAYOUT_KEY)
    }

    pub fn with_key(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Load the saved layout.
    ///
    /// An absent key is `Ok(None)`. A payload that is not a widget array is
    /// a `Serialization` error.
    pub fn load_layout(&self) -> StorageResult<Option<Vec<Widget>>> {
        let json = match self.storage.load(&self.key) {
            Ok(json) => json,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("Invalid layout snapshot: {}", e)))
    }

    /// Overwrite the saved layout with `widgets`.
    pub fn save_layout(&self, widgets: &[Widget]) -> StorageResult<()> {
        let json = serde_json::to_string(widgets)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.save(&self.key, &json)
    }

    /// Remove the saved layout entirely.
    pub fn clear_layout(&self) -> StorageResult<()> {
        self.storage.delete(&self.key)
    }
}
