//! Inquiry records, replies, tracked persons and change records.
//!
//! Serialized field names follow the layout of the per-person snapshot files
//! (`from`, `replies`, `replies_data`, `lastModified`, ...) so that state
//! written by earlier deployments keeps loading.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── InquiryKind ──────────────────────────────────────────────────────────────

/// The two inquiry subtypes tracked by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InquiryKind {
    /// Interpellation (`INT`).
    #[serde(rename = "INT")]
    Interpellation,
    /// Written question (`ZAP`).
    #[serde(rename = "ZAP")]
    WrittenQuestion,
}

impl InquiryKind {
    /// Short code used in snapshot files and message headers.
    pub fn code(self) -> &'static str {
        match self {
            InquiryKind::Interpellation => "INT",
            InquiryKind::WrittenQuestion => "ZAP",
        }
    }

    /// Path segment of the Sejm API collection for this kind.
    pub fn api_collection(self) -> &'static str {
        match self {
            InquiryKind::Interpellation => "interpellations",
            InquiryKind::WrittenQuestion => "writtenQuestions",
        }
    }

    pub const ALL: [InquiryKind; 2] = [InquiryKind::Interpellation, InquiryKind::WrittenQuestion];
}

impl fmt::Display for InquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── InquiryKey ───────────────────────────────────────────────────────────────

/// Compound identity of an inquiry. Numbers are only unique per kind, so the
/// kind is always part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InquiryKey {
    pub id: String,
    pub kind: InquiryKind,
}

impl InquiryKey {
    pub fn new(id: impl Into<String>, kind: InquiryKind) -> Self {
        InquiryKey {
            id: id.into(),
            kind,
        }
    }
}

impl fmt::Display for InquiryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

// ── Reply ────────────────────────────────────────────────────────────────────

/// One reply attached to an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// `true` when the reply only extends the answer deadline.
    #[serde(rename = "prolongation", default, deserialize_with = "null_as_default")]
    pub is_prolongation: bool,
    #[serde(rename = "lastModified", default, deserialize_with = "null_as_default")]
    pub last_modified: String,
    #[serde(rename = "receiptDate", default, deserialize_with = "null_as_default")]
    pub receipt_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
}

// ── InquiryRecord ────────────────────────────────────────────────────────────

/// A single interpellation or written question as of one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InquiryKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "link_href")]
    pub url: String,
    /// Comma-joined submitter ids as returned by the source.
    #[serde(rename = "from", default, deserialize_with = "null_as_default")]
    pub submitters: String,
    #[serde(rename = "replies", default, deserialize_with = "null_as_default")]
    pub reply_count: usize,
    /// Replies in source order. Assumed append-only across fetches.
    #[serde(rename = "replies_data", default, deserialize_with = "null_as_default")]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub submission_date: Option<String>,
}

impl InquiryRecord {
    pub fn key(&self) -> InquiryKey {
        InquiryKey::new(self.id.clone(), self.kind)
    }

    /// Submitter ids split out of the comma-joined `submitters` field.
    pub fn submitter_ids(&self) -> Vec<&str> {
        split_ids(&self.submitters)
    }
}

/// A person's full inquiry list as of one run.
pub type Snapshot = Vec<InquiryRecord>;

/// Split a comma-joined id list, dropping blanks.
pub fn split_ids(field: &str) -> Vec<&str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read an explicit `null` as the type's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An identifier given as a JSON string or number. `null` reads as empty.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a string or number, found {other}"))),
    }
}

/// Accept either a bare link string or a link object carrying `href`.
fn link_href<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(href_of(&value))
}

/// Extract the link target from a string or `{"href": ...}` value.
pub fn href_of(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(obj) => obj
            .get("href")
            .and_then(|h| h.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

// ── TrackedPerson ────────────────────────────────────────────────────────────

/// A representative whose inquiries are monitored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPerson {
    /// Sejm MP id. Config files may give it as a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Space-separated chat mention tokens, e.g. `"@alice @bob"`.
    #[serde(rename = "mattermost_users", default)]
    pub mentions: String,
}

impl TrackedPerson {
    pub fn mention_tokens(&self) -> impl Iterator<Item = &str> {
        self.mentions.split_whitespace()
    }
}

// ── ChangeRecord ─────────────────────────────────────────────────────────────

/// An inquiry that gained replies since the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub key: InquiryKey,
    pub title: String,
    pub url: String,
    /// Display names of the submitters, comma-joined.
    pub submitter_names: String,
    pub previous_replies: usize,
    pub current_replies: usize,
    pub new_count: usize,
    /// Distinct authors of the replies beyond the previous count.
    pub reply_authors: Vec<String>,
    /// Every reply so far is a deadline extension.
    pub has_prolongation: bool,
    pub mentions: Vec<String>,
    pub submission_date: Option<String>,
    pub first_response_date: Option<String>,
    pub days_to_response: Option<i64>,
}
