//! One full pass over every tracked representative.
//!
//! Per person: load the stored snapshot, fetch the current one, reconcile,
//! replace the stored snapshot. Changes from all persons are merged and
//! handed to the notifier once at the end. A failing person is logged and
//! skipped; nothing here aborts the run.

use interpel_core::{
    merge_changes, reconcile, Audience, ChangeRecord, Directory, InquiryRecord, TrackedPerson,
};
use interpel_storage::{SnapshotStore, StorageError};
use tracing::{error, info, warn};

use crate::notify::{deliver_all, DeliveryReport, Notifier};
use crate::source::{InquirySource, SourceError};

/// Why a single person produced no changes.
#[derive(Debug, thiserror::Error)]
pub enum PersonError {
    #[error(transparent)]
    Fetch(#[from] SourceError),

    #[error("source returned no inquiries; keeping the stored snapshot")]
    EmptyFetch,

    #[error(transparent)]
    Save(#[from] StorageError),
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub persons: usize,
    pub failed_persons: usize,
    pub changes: usize,
    pub delivery: DeliveryReport,
}

/// Collaborators for a run.
pub struct Pipeline<'a> {
    pub persons: &'a [TrackedPerson],
    pub source: &'a dyn InquirySource,
    pub directory: &'a dyn Directory,
    pub store: &'a dyn SnapshotStore,
    /// `None` when no webhook is configured; changes are then only logged.
    pub notifier: Option<&'a dyn Notifier>,
    /// `false` for dry runs: stored snapshots are read but never replaced,
    /// so the changes shown are reported again by the next real run.
    pub persist: bool,
}

impl Pipeline<'_> {
    /// Process every person, then deliver the merged changes.
    pub fn run(&self) -> RunSummary {
        let audience = Audience::new(self.persons);
        let mut summary = RunSummary::default();
        let mut all_changes: Vec<ChangeRecord> = Vec::new();

        info!(persons = self.persons.len(), "starting run");

        for person in self.persons {
            summary.persons += 1;
            match self.process_person(person, &audience) {
                Ok(changes) => all_changes.extend(changes),
                Err(e) => {
                    summary.failed_persons += 1;
                    error!(person = %person.id, error = %e, "skipping representative");
                }
            }
        }

        let merged = merge_changes(all_changes);
        summary.changes = merged.len();

        if !merged.is_empty() {
            match self.notifier {
                Some(notifier) => summary.delivery = deliver_all(&merged, notifier),
                None => warn!(
                    count = merged.len(),
                    "no webhook URL configured; skipping notifications"
                ),
            }
        }

        info!(
            persons = summary.persons,
            failed_persons = summary.failed_persons,
            changes = summary.changes,
            sent = summary.delivery.sent,
            failed_sends = summary.delivery.failed,
            "run finished"
        );
        summary
    }

    fn process_person(
        &self,
        person: &TrackedPerson,
        audience: &Audience<'_>,
    ) -> Result<Vec<ChangeRecord>, PersonError> {
        info!(person = %person.id, "processing representative");

        let previous = match self.store.load(&person.id) {
            Ok(previous) => previous,
            Err(e) => {
                warn!(
                    person = %person.id,
                    error = %e,
                    "stored snapshot unreadable; treating as first run"
                );
                None
            }
        };

        let current = self.source.fetch_inquiries(&person.id)?;
        if current.is_empty() {
            return Err(PersonError::EmptyFetch);
        }
        info!(person = %person.id, inquiries = current.len(), "fetched inquiries");

        let changes = match &previous {
            Some(previous) => reconcile(&current, previous, self.directory, audience),
            None => {
                info!(person = %person.id, "no stored snapshot; recording baseline");
                Vec::new()
            }
        };

        if self.persist {
            self.store.save(&person.id, &current)?;
            log_snapshot_stats(&person.id, &current);
        } else {
            info!(person = %person.id, "dry run; stored snapshot left unchanged");
        }

        if changes.is_empty() {
            info!(person = %person.id, "no new replies");
        } else {
            let ids: Vec<String> = changes.iter().map(|c| c.key.to_string()).collect();
            info!(
                person = %person.id,
                count = changes.len(),
                inquiries = %ids.join(", "),
                "new replies found"
            );
        }
        Ok(changes)
    }
}

fn log_snapshot_stats(person_id: &str, snapshot: &[InquiryRecord]) {
    let total = snapshot.len();
    let answered = snapshot.iter().filter(|r| r.reply_count > 0).count();
    let answered_pct = if total == 0 {
        0.0
    } else {
        answered as f64 * 100.0 / total as f64
    };
    info!(
        person = person_id,
        total,
        answered,
        unanswered = total - answered,
        answered_pct = format_args!("{answered_pct:.1}"),
        "snapshot saved"
    );
}
