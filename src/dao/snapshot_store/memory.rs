use std::sync::Mutex;

use crate::dao::{
    models::GameSnapshotEntity,
    storage::{StorageError, StorageResult},
};

use super::SnapshotStore;

/// Snapshot store keeping the serialized document in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    document: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw document, corrupt or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw document currently held.
    pub fn raw(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> StorageResult<Option<GameSnapshotEntity>> {
        match self.raw() {
            Some(raw) => GameSnapshotEntity::from_json(&raw)
                .map(Some)
                .map_err(|source| StorageError::corrupt("parsing in-memory snapshot".into(), source)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &GameSnapshotEntity) -> StorageResult<()> {
        let raw = snapshot
            .to_json()
            .map_err(|source| StorageError::corrupt("serializing snapshot".into(), source))?;
        *self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}
