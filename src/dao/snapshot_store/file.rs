use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::dao::{
    models::GameSnapshotEntity,
    storage::{StorageError, StorageResult},
};

use super::SnapshotStore;

/// Snapshot store writing a JSON document on the local disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Store the snapshot at `path`; parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> StorageResult<Option<GameSnapshotEntity>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("reading `{}`", self.path.display()),
                    err,
                ));
            }
        };

        GameSnapshotEntity::from_json(&contents)
            .map(Some)
            .map_err(|source| {
                StorageError::corrupt(format!("parsing `{}`", self.path.display()), source)
            })
    }

    fn save(&self, snapshot: &GameSnapshotEntity) -> StorageResult<()> {
        let mut snapshot = snapshot.clone();
        snapshot.saved_at = OffsetDateTime::now_utc().format(&Rfc3339).ok();

        let payload = serde_json::to_string_pretty(&snapshot).map_err(|source| {
            StorageError::corrupt("serializing snapshot".into(), source)
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                StorageError::unavailable(format!("creating `{}`", parent.display()), err)
            })?;
        }

        let temp = self.temp_path();
        fs::write(&temp, payload).map_err(|err| {
            StorageError::unavailable(format!("writing `{}`", temp.display()), err)
        })?;
        fs::rename(&temp, &self.path).map_err(|err| {
            StorageError::unavailable(format!("replacing `{}`", self.path.display()), err)
        })?;

        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::unavailable(
                format!("removing `{}`", self.path.display()),
                err,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::GameState;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("charades-back-{}", uuid::Uuid::new_v4().simple()))
            .join(name)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = FileSnapshotStore::new(scratch_path("absent.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch_path("snapshot.json");
        let store = FileSnapshotStore::new(&path);
        let mut entity = GameSnapshotEntity::from(&GameState::default());
        entity.current_round = 2;

        store.save(&entity).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.saved_at.is_some());
        assert_eq!(GameState::from_snapshot(loaded), GameState::from_snapshot(entity));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let path = scratch_path("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = FileSnapshotStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
