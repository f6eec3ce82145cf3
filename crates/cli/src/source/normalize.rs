//! Turning raw Sejm API items into [`InquiryRecord`]s.
//!
//! The API is loose about shapes: numbers arrive as strings or integers,
//! `from` as a string or a list, links as objects. Each field shape gets one
//! function here and nothing past this module sees raw JSON.

use interpel_core::model::href_of;
use interpel_core::{InquiryKind, InquiryRecord, Reply};
use serde_json::Value;

/// Fields tried, in order, for an inquiry's submission date.
const SUBMISSION_DATE_FIELDS: [&str; 4] = ["submissionDate", "date", "created", "receiptDate"];

/// Why a single list item was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("item is not a JSON object")]
    NotAnObject,
    #[error("item has no usable `num`")]
    MissingNumber,
}

/// Normalize one element of a list endpoint response.
pub fn normalize_item(item: &Value, kind: InquiryKind) -> Result<InquiryRecord, NormalizeError> {
    if !item.is_object() {
        return Err(NormalizeError::NotAnObject);
    }
    let id = inquiry_number(item.get("num")).ok_or(NormalizeError::MissingNumber)?;
    let (reply_count, replies) = replies(item.get("replies"));

    Ok(InquiryRecord {
        id,
        kind,
        title: text(item.get("title")),
        url: first_link(item.get("links")),
        submitters: joined_list(item.get("from")),
        reply_count,
        replies,
        submission_date: submission_date(item),
    })
}

/// `num` as a non-empty string, whether sent as a number or a string.
fn inquiry_number(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// A plain string field, empty when absent or not a string.
fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A string, number or list of those, as one comma-joined string.
fn joined_list(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

/// Target of the first entry in `links`.
fn first_link(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .and_then(|links| links.first())
        .map(href_of)
        .unwrap_or_default()
}

/// Reply count and the reply entries that are objects.
///
/// The count covers every element, matching what the API reports even if
/// an entry is malformed.
fn replies(value: Option<&Value>) -> (usize, Vec<Reply>) {
    let Some(items) = value.and_then(Value::as_array) else {
        return (0, Vec::new());
    };
    let replies = items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| Reply {
            key: text(item.get("key")),
            is_prolongation: item
                .get("prolongation")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            last_modified: text(item.get("lastModified")),
            receipt_date: text(item.get("receiptDate")),
            author: joined_list(item.get("from")),
        })
        .collect();
    (items.len(), replies)
}

/// First non-empty submission date field of an item or detail response.
pub fn submission_date(item: &Value) -> Option<String> {
    SUBMISSION_DATE_FIELDS
        .iter()
        .filter_map(|field| item.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
