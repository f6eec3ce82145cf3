//! File backend: one indented JSON array per tracked person.

use std::io::ErrorKind;
use std::path::PathBuf;

use interpel_core::{InquiryRecord, Snapshot};

use crate::error::StorageError;
use crate::traits::{check_person_id, SnapshotStore};

/// Stores each person's snapshot at `{dir}/interpel_{person_id}.json`.
///
/// Files are pretty-printed UTF-8 so operators can read and hand-edit them.
/// The directory is created on the first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    /// Path of the snapshot file for `person_id`.
    pub fn path_for(&self, person_id: &str) -> Result<PathBuf, StorageError> {
        check_person_id(person_id)?;
        Ok(self.dir.join(format!("interpel_{person_id}.json")))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError> {
        let path = self.path_for(person_id)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Corrupt { path, source })
    }

    fn save(&self, person_id: &str, snapshot: &[InquiryRecord]) -> Result<(), StorageError> {
        let path = self.path_for(person_id)?;
        let mut json = serde_json::to_string_pretty(snapshot).map_err(StorageError::Serialize)?;
        json.push('\n');

        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| StorageError::Io { path, source })
    }
}
