//! End-to-end reconciliation scenarios over snapshots in their on-disk JSON
//! form, plus exhaustive checks of the emit/skip rule on small counts.

use interpel_core::{
    detect_changes, format_message, merge_changes, reconcile, Audience, Directory, InquiryKey,
    InquiryKind, InquiryRecord, Reply, TrackedPerson,
};
use serde_json::json;

struct NoLookups;

impl Directory for NoLookups {
    fn submission_date(&self, _key: &InquiryKey) -> Option<String> {
        None
    }

    fn person_name(&self, person_id: &str) -> Option<String> {
        Some(format!("Person {person_id}"))
    }
}

fn snapshot(value: serde_json::Value) -> Vec<InquiryRecord> {
    serde_json::from_value(value).expect("valid snapshot JSON")
}

fn record_with(id: &str, kind: InquiryKind, count: usize, prolongations: &[bool]) -> InquiryRecord {
    InquiryRecord {
        id: id.to_string(),
        kind,
        title: String::new(),
        url: String::new(),
        submitters: String::new(),
        reply_count: count,
        replies: prolongations
            .iter()
            .enumerate()
            .map(|(i, p)| Reply {
                key: format!("R{i}"),
                is_prolongation: *p,
                last_modified: String::new(),
                receipt_date: String::new(),
                author: format!("Author {i}"),
            })
            .collect(),
        submission_date: None,
    }
}

#[test]
fn second_reply_from_ministry_is_reported() {
    let previous = snapshot(json!([{
        "id": "1", "type": "INT", "title": "Water", "url": "https://sejm.test/1",
        "from": "55", "replies": 1,
        "replies_data": [
            {"key": "A", "prolongation": false, "lastModified": "2024-02-01T09:00:00",
             "receiptDate": "2024-01-31", "author": "Prime Minister"}
        ]
    }]));
    let current = snapshot(json!([{
        "id": "1", "type": "INT", "title": "Water", "url": "https://sejm.test/1",
        "from": "55", "replies": 2,
        "replies_data": [
            {"key": "A", "prolongation": false, "lastModified": "2024-02-01T09:00:00",
             "receiptDate": "2024-01-31", "author": "Prime Minister"},
            {"key": "B", "prolongation": false, "lastModified": "2024-03-01T09:00:00",
             "receiptDate": "2024-02-28", "author": "Ministry X"}
        ],
        "submission_date": "2024-01-10"
    }]));
    let persons = vec![TrackedPerson {
        id: "55".into(),
        mentions: "@water-team".into(),
    }];

    let changes = reconcile(&current, &previous, &NoLookups, &Audience::new(&persons));

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.key, InquiryKey::new("1", InquiryKind::Interpellation));
    assert_eq!(change.new_count, 1);
    assert_eq!(change.reply_authors, vec!["Ministry X"]);
    assert!(!change.has_prolongation);
    assert_eq!(change.submitter_names, "Person 55");
    assert_eq!(change.mentions, vec!["@water-team"]);
    assert_eq!(change.days_to_response, Some(22));

    let text = format_message(change);
    assert!(text.contains("#### Water INT (1)"));
    assert!(text.contains("Replies: 1 → 2 (+1)"));
    assert!(text.ends_with("@water-team\n"));
}

#[test]
fn unseen_unanswered_inquiry_is_silent() {
    let current = snapshot(json!([{
        "id": "77", "type": "ZAP", "title": "Bridges", "url": "", "from": "55",
        "replies": 0, "replies_data": []
    }]));
    assert!(reconcile(&current, &[], &NoLookups, &Audience::new(&[])).is_empty());
}

#[test]
fn emit_rule_holds_for_all_small_counts() {
    for previous_count in 0..5usize {
        for current_count in 0..5usize {
            let previous = vec![record_with("1", InquiryKind::Interpellation, previous_count, &[])];
            let current = vec![record_with(
                "1",
                InquiryKind::Interpellation,
                current_count,
                &vec![false; current_count],
            )];
            let emitted = !detect_changes(&current, &previous).is_empty();
            assert_eq!(
                emitted,
                current_count > previous_count,
                "previous={previous_count} current={current_count}"
            );

            let emitted_when_unseen = !detect_changes(&current, &[]).is_empty();
            assert_eq!(emitted_when_unseen, current_count > 0, "unseen current={current_count}");
        }
    }
}

#[test]
fn reconcile_against_itself_is_empty() {
    let snapshot = vec![
        record_with("1", InquiryKind::Interpellation, 2, &[true, false]),
        record_with("1", InquiryKind::WrittenQuestion, 1, &[true]),
        record_with("2", InquiryKind::WrittenQuestion, 0, &[]),
    ];
    assert!(reconcile(&snapshot, &snapshot, &NoLookups, &Audience::new(&[])).is_empty());
}

#[test]
fn prolongation_flag_matches_every_reply_shape() {
    let shapes: &[&[bool]] = &[
        &[true],
        &[false],
        &[true, true, true],
        &[true, false, true],
        &[false, true],
        &[true, true, false],
    ];
    for shape in shapes {
        let current = vec![record_with("1", InquiryKind::Interpellation, shape.len(), shape)];
        let changes = detect_changes(&current, &[]);
        let expected = shape.iter().all(|p| *p);
        assert_eq!(changes[0].has_prolongation, expected, "{shape:?}");
    }
}

#[test]
fn co_submitted_inquiry_reported_by_two_persons_merges() {
    let current = snapshot(json!([{
        "id": "9", "type": "INT", "title": "Schools", "url": "", "from": "1, 2",
        "replies": 1,
        "replies_data": [{"key": "A", "prolongation": false, "lastModified": "2024-01-02",
                          "receiptDate": "2024-01-01", "author": "Ministry of Education"}]
    }]));
    let persons = vec![
        TrackedPerson {
            id: "1".into(),
            mentions: "@a @b".into(),
        },
        TrackedPerson {
            id: "2".into(),
            mentions: "@b @c".into(),
        },
    ];

    // Each person sees the inquiry with only their own mentions configured.
    let first = reconcile(&current, &[], &NoLookups, &Audience::new(&persons[..1]));
    let second = reconcile(&current, &[], &NoLookups, &Audience::new(&persons[1..]));
    let merged = merge_changes(first.into_iter().chain(second));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].mentions, vec!["@a", "@b", "@c"]);
}
