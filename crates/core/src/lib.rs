//! interpel-core: change detection for parliamentary inquiry replies.
//!
//! Given the inquiries of one tracked representative as fetched now and as
//! stored after the previous run, works out which inquiries received new
//! replies and turns those into chat messages.
//!
//! # Public API
//!
//! - [`reconcile()`] -- diff two snapshots and enrich the hits into [`ChangeRecord`]s
//! - [`detect_changes()`] -- the pure diff, without external lookups
//! - [`merge_changes()`] -- collapse records reported by several tracked co-submitters
//! - [`format_message()`] -- render a record as a Markdown chat message
//! - [`dates`] -- tolerant timestamp parsing and day arithmetic

pub mod aggregate;
pub mod dates;
pub mod message;
pub mod model;
pub mod reconcile;

// ── Convenience re-exports ───────────────────────────────────────────

pub use aggregate::merge_changes;
pub use message::format_message;
pub use model::{
    ChangeRecord, InquiryKey, InquiryKind, InquiryRecord, Reply, Snapshot, TrackedPerson,
};
pub use reconcile::{detect_changes, reconcile, Audience, DetectedChange, Directory};
