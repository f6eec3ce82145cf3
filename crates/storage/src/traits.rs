use interpel_core::{InquiryRecord, Snapshot};

use crate::error::StorageError;

/// Persistence for the last-known inquiry snapshot of each tracked person.
///
/// ## Snapshot Semantics
///
/// A snapshot is stored and replaced as one unit. `save` overwrites
/// whatever was stored for the person before; no history is kept. There is
/// no transaction: a crash mid-write may leave the previous snapshot, the
/// new one, or (for file backends) a truncated file that later loads as
/// [`StorageError::Corrupt`].
///
/// Record order is preserved exactly as passed to `save`.
pub trait SnapshotStore {
    /// Load the stored snapshot for `person_id`.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn load(&self, person_id: &str) -> Result<Option<Snapshot>, StorageError>;

    /// Replace the stored snapshot for `person_id`.
    fn save(&self, person_id: &str, snapshot: &[InquiryRecord]) -> Result<(), StorageError>;
}

/// Reject ids that are empty or would escape a storage directory.
pub(crate) fn check_person_id(person_id: &str) -> Result<(), StorageError> {
    let bad = person_id.trim().is_empty()
        || person_id.contains(['/', '\\'])
        || person_id.contains("..");
    if bad {
        return Err(StorageError::InvalidPersonId(person_id.to_string()));
    }
    Ok(())
}
