//! Merging change records collected from several tracked persons.

use std::collections::HashMap;

use crate::model::{ChangeRecord, InquiryKey};

/// Collapse records that describe the same inquiry.
///
/// An inquiry with several tracked co-submitters is reported once per
/// person. The first record seen wins; later duplicates only contribute
/// their mentions, appended after the existing ones without repeats.
pub fn merge_changes(changes: impl IntoIterator<Item = ChangeRecord>) -> Vec<ChangeRecord> {
    let mut merged: Vec<ChangeRecord> = Vec::new();
    let mut positions: HashMap<InquiryKey, usize> = HashMap::new();

    for change in changes {
        match positions.get(&change.key) {
            Some(&at) => {
                let existing = &mut merged[at];
                for mention in change.mentions {
                    if !existing.mentions.contains(&mention) {
                        existing.mentions.push(mention);
                    }
                }
            }
            None => {
                positions.insert(change.key.clone(), merged.len());
                merged.push(change);
            }
        }
    }

    merged
}
