//! Change detection between two snapshots of a person's inquiries.
//!
//! [`detect_changes`] is the pure diff: it decides which inquiries gained
//! replies and derives everything that can be read off the records alone.
//! [`reconcile`] runs the diff and then enriches each hit through a
//! [`Directory`] (submission dates, submitter names) and an [`Audience`]
//! (chat mentions).
//!
//! New replies are taken positionally: the replies past the previous count
//! are the new ones. This holds only while the source keeps reply lists
//! append-only and in arrival order. A reordered or shortened list yields
//! wrong author attribution; nothing here tries to detect that.

use std::collections::HashMap;

use crate::dates::days_between;
use crate::model::{ChangeRecord, InquiryKey, InquiryRecord, TrackedPerson};

// ── External lookups ─────────────────────────────────────────────────────────

/// Lookups against the inquiry source, used only for changed inquiries.
pub trait Directory {
    /// Submission date from the per-inquiry detail endpoint.
    fn submission_date(&self, key: &InquiryKey) -> Option<String>;

    /// Display name of a representative.
    fn person_name(&self, person_id: &str) -> Option<String>;
}

/// Maps submitter ids to the chat mentions configured for them.
#[derive(Debug, Clone, Copy)]
pub struct Audience<'a> {
    persons: &'a [TrackedPerson],
}

impl<'a> Audience<'a> {
    pub fn new(persons: &'a [TrackedPerson]) -> Self {
        Audience { persons }
    }

    /// Mentions of every tracked person among `submitter_ids`, in config
    /// order, without duplicates.
    pub fn mentions_for(&self, submitter_ids: &[&str]) -> Vec<String> {
        let mut mentions: Vec<String> = Vec::new();
        for person in self.persons {
            if person.id.is_empty() || !submitter_ids.contains(&person.id.as_str()) {
                continue;
            }
            for token in person.mention_tokens() {
                if !mentions.iter().any(|m| m == token) {
                    mentions.push(token.to_string());
                }
            }
        }
        mentions
    }
}

// ── Pure diff ────────────────────────────────────────────────────────────────

/// An inquiry whose reply count grew, before any external lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedChange<'a> {
    pub record: &'a InquiryRecord,
    /// Stored count, or 0 when the inquiry was not in the previous snapshot.
    pub previous_replies: usize,
    pub reply_authors: Vec<String>,
    pub has_prolongation: bool,
}

impl DetectedChange<'_> {
    pub fn new_count(&self) -> usize {
        self.record.reply_count - self.previous_replies
    }
}

/// Inquiries in `current` with more replies than in `previous`, in the order
/// of `current`.
pub fn detect_changes<'a>(
    current: &'a [InquiryRecord],
    previous: &[InquiryRecord],
) -> Vec<DetectedChange<'a>> {
    let previous_counts: HashMap<InquiryKey, usize> = previous
        .iter()
        .map(|record| (record.key(), record.reply_count))
        .collect();

    current
        .iter()
        .filter_map(|record| {
            let previous_replies = previous_counts.get(&record.key()).copied().unwrap_or(0);
            if record.reply_count <= previous_replies {
                return None;
            }
            Some(DetectedChange {
                record,
                previous_replies,
                reply_authors: new_reply_authors(record, previous_replies),
                has_prolongation: all_prolongations(record),
            })
        })
        .collect()
}

/// Distinct authors of replies in `[previous_count, reply_count)`, clamped
/// to the replies actually present.
fn new_reply_authors(record: &InquiryRecord, previous_count: usize) -> Vec<String> {
    let end = record.reply_count.min(record.replies.len());
    let start = previous_count.min(end);

    let mut authors: Vec<String> = Vec::new();
    for reply in &record.replies[start..end] {
        if !reply.author.is_empty() && !authors.contains(&reply.author) {
            authors.push(reply.author.clone());
        }
    }
    authors
}

/// True iff there is at least one reply and every reply is a prolongation.
fn all_prolongations(record: &InquiryRecord) -> bool {
    !record.replies.is_empty() && record.replies.iter().all(|r| r.is_prolongation)
}

// ── Enrichment ───────────────────────────────────────────────────────────────

/// Diff `current` against `previous` and build a [`ChangeRecord`] for every
/// inquiry that gained replies.
pub fn reconcile(
    current: &[InquiryRecord],
    previous: &[InquiryRecord],
    directory: &dyn Directory,
    audience: &Audience<'_>,
) -> Vec<ChangeRecord> {
    let detected = detect_changes(current, previous);
    let mut names = NameCache::new(directory);

    detected
        .into_iter()
        .map(|change| {
            let record = change.record;
            let submitter_ids = record.submitter_ids();
            let timing = resolve_timing(record, directory);

            ChangeRecord {
                key: record.key(),
                title: record.title.clone(),
                url: record.url.clone(),
                submitter_names: names.display_names(&submitter_ids),
                previous_replies: change.previous_replies,
                current_replies: record.reply_count,
                new_count: change.new_count(),
                reply_authors: change.reply_authors,
                has_prolongation: change.has_prolongation,
                mentions: audience.mentions_for(&submitter_ids),
                submission_date: timing.submission_date,
                first_response_date: timing.first_response_date,
                days_to_response: timing.days_to_response,
            }
        })
        .collect()
}

#[derive(Debug, Default, PartialEq)]
struct Timing {
    submission_date: Option<String>,
    first_response_date: Option<String>,
    days_to_response: Option<i64>,
}

/// Submission date from the record, else the detail lookup, else the
/// earliest reply receipt date. First response is the earliest
/// `last_modified` regardless of where the submission date came from.
fn resolve_timing(record: &InquiryRecord, directory: &dyn Directory) -> Timing {
    let submission_date = record
        .submission_date
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| directory.submission_date(&record.key()).filter(|s| !s.is_empty()))
        .or_else(|| earliest(record.replies.iter().map(|r| r.receipt_date.as_str())));

    let first_response_date = earliest(record.replies.iter().map(|r| r.last_modified.as_str()));

    let days_to_response = match (&submission_date, &first_response_date) {
        (Some(submitted), Some(answered)) => days_between(submitted, answered),
        _ => None,
    };

    Timing {
        submission_date,
        first_response_date,
        days_to_response,
    }
}

/// Smallest non-empty value. ISO-8601 strings order chronologically.
fn earliest<'s>(values: impl Iterator<Item = &'s str>) -> Option<String> {
    values.filter(|v| !v.is_empty()).min().map(str::to_string)
}

/// Resolves each distinct person id at most once per reconciliation.
struct NameCache<'d> {
    directory: &'d dyn Directory,
    names: HashMap<String, String>,
}

impl<'d> NameCache<'d> {
    fn new(directory: &'d dyn Directory) -> Self {
        NameCache {
            directory,
            names: HashMap::new(),
        }
    }

    fn display_names(&mut self, ids: &[&str]) -> String {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let directory = self.directory;
            let name = self.names.entry((*id).to_string()).or_insert_with(|| {
                directory
                    .person_name(id)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("MP {id}"))
            });
            resolved.push(name.clone());
        }
        resolved.join(", ")
    }
}
