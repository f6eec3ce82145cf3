use std::path::PathBuf;

/// All errors that can be returned by a SnapshotStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The person id cannot be turned into a storage key (empty, or
    /// containing path separators).
    #[error("invalid person id for snapshot storage: {0:?}")]
    InvalidPersonId(String),

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored snapshot exists but is not a valid inquiry list.
    #[error("snapshot at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized.
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}
