mod file;
mod memory;

pub use self::file::FileSnapshotStore;
pub use self::memory::MemorySnapshotStore;

use crate::dao::{models::GameSnapshotEntity, storage::StorageResult};

/// Abstraction over the place where the session snapshot lives between runs.
pub trait SnapshotStore: Send + Sync {
    /// Read the last saved snapshot, `None` when nothing was saved yet.
    fn load(&self) -> StorageResult<Option<GameSnapshotEntity>>;
    /// Replace the saved snapshot.
    fn save(&self, snapshot: &GameSnapshotEntity) -> StorageResult<()>;
    /// Forget the saved snapshot.
    fn clear(&self) -> StorageResult<()>;
}
