//! In-process backend for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use interpel_core::{InquiryRecord, Snapshot};

use crate::error::StorageError;
use crate::traits::{check_person_id, SnapshotStore};

/// Keeps snapshots in a map for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: RefCell<HashMap<String, Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored snapshot.
    pub fn with_snapshot(self, person_id: &str, snapshot: Snapshot) -> Self {
        self.snapshots
            .borrow_mut()
            .insert(person_id.to_string(), snapshot);
        self
    }

    /// Current stored snapshot, cloned.
    pub fn get(&self, person_id: &str) -> Option<Snapshot> {
        self.snapshots.borrow().get(person_id).cloned()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError> {
        check_person_id(person_id)?;
        Ok(self.get(person_id))
    }

    fn save(&self, person_id: &str, snapshot: &[InquiryRecord]) -> Result<(), StorageError> {
        check_person_id(person_id)?;
        self.snapshots
            .borrow_mut()
            .insert(person_id.to_string(), snapshot.to_vec());
        Ok(())
    }
}
