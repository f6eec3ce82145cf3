//! interpel-storage: persistence of per-person inquiry snapshots.

pub mod conformance;
mod error;
mod json_file;
mod memory;
mod traits;

pub use error::StorageError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::SnapshotStore;
