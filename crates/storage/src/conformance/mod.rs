//! Conformance suite for `SnapshotStore` implementations.
//!
//! Covers the behaviour the orchestrator relies on:
//!
//! - **Missing**: loading an unknown person yields `None`, not an error
//! - **Round trip**: saved records come back equal and in order
//! - **Replace**: a second save fully replaces the first
//! - **Isolation**: persons do not see each other's snapshots
//! - **Empty**: an empty snapshot is stored as empty, not as missing
//! - **Invalid ids**: path-like ids are rejected
//!
//! # Usage
//!
//! ```ignore
//! use interpel_storage::conformance::run_conformance_suite;
//!
//! #[test]
//! fn file_store_conformance() {
//!     let report = run_conformance_suite(|| make_fresh_store());
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

use std::fmt;

use interpel_core::{InquiryKind, InquiryRecord, Reply};

use crate::{SnapshotStore, StorageError};

/// Result of a single conformance check.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => Self {
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}]: {}",
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

type Check<S> = fn(&S) -> Result<(), String>;

/// Run every check against a fresh store from `factory`.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: SnapshotStore,
    F: Fn() -> S,
{
    let checks: [(&str, Check<S>); 6] = [
        ("missing_person_loads_none", missing_person_loads_none),
        ("save_then_load_round_trips", save_then_load_round_trips),
        ("second_save_replaces_first", second_save_replaces_first),
        ("persons_are_isolated", persons_are_isolated),
        ("empty_snapshot_is_not_missing", empty_snapshot_is_not_missing),
        ("path_like_ids_are_rejected", path_like_ids_are_rejected),
    ];

    let results: Vec<TestResult> = checks
        .iter()
        .map(|(name, check)| TestResult::from_result(name, check(&factory())))
        .collect();

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Checks ───────────────────────────────────────────────────────────────────

fn missing_person_loads_none<S: SnapshotStore>(store: &S) -> Result<(), String> {
    match store.load("404") {
        Ok(None) => Ok(()),
        other => Err(format!("expected Ok(None), got {other:?}")),
    }
}

fn save_then_load_round_trips<S: SnapshotStore>(store: &S) -> Result<(), String> {
    let snapshot = vec![
        make_record("2", InquiryKind::WrittenQuestion, 1),
        make_record("10", InquiryKind::Interpellation, 0),
        make_record("2", InquiryKind::Interpellation, 2),
    ];
    store.save("1", &snapshot).map_err(|e| e.to_string())?;
    let loaded = load_some(store, "1")?;
    if loaded != snapshot {
        return Err(format!("loaded {loaded:?}, expected {snapshot:?}"));
    }
    Ok(())
}

fn second_save_replaces_first<S: SnapshotStore>(store: &S) -> Result<(), String> {
    store
        .save(
            "1",
            &[
                make_record("1", InquiryKind::Interpellation, 0),
                make_record("2", InquiryKind::Interpellation, 0),
            ],
        )
        .map_err(|e| e.to_string())?;
    let replacement = vec![make_record("3", InquiryKind::WrittenQuestion, 4)];
    store.save("1", &replacement).map_err(|e| e.to_string())?;

    let loaded = load_some(store, "1")?;
    if loaded != replacement {
        return Err(format!("expected only the replacement, got {loaded:?}"));
    }
    Ok(())
}

fn persons_are_isolated<S: SnapshotStore>(store: &S) -> Result<(), String> {
    let a = vec![make_record("1", InquiryKind::Interpellation, 1)];
    let b = vec![make_record("9", InquiryKind::WrittenQuestion, 3)];
    store.save("100", &a).map_err(|e| e.to_string())?;
    store.save("200", &b).map_err(|e| e.to_string())?;

    if load_some(store, "100")? != a || load_some(store, "200")? != b {
        return Err("snapshots leaked between persons".to_string());
    }
    Ok(())
}

fn empty_snapshot_is_not_missing<S: SnapshotStore>(store: &S) -> Result<(), String> {
    store.save("1", &[]).map_err(|e| e.to_string())?;
    let loaded = load_some(store, "1")?;
    if !loaded.is_empty() {
        return Err(format!("expected empty snapshot, got {loaded:?}"));
    }
    Ok(())
}

fn path_like_ids_are_rejected<S: SnapshotStore>(store: &S) -> Result<(), String> {
    for id in ["", "../x", "a/b"] {
        match store.save(id, &[]) {
            Err(StorageError::InvalidPersonId(_)) => {}
            other => return Err(format!("save({id:?}) returned {other:?}")),
        }
        match store.load(id) {
            Err(StorageError::InvalidPersonId(_)) => {}
            other => return Err(format!("load({id:?}) returned {other:?}")),
        }
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn load_some<S: SnapshotStore>(store: &S, person_id: &str) -> Result<Vec<InquiryRecord>, String> {
    store
        .load(person_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("nothing stored for {person_id}"))
}

fn make_record(id: &str, kind: InquiryKind, replies: usize) -> InquiryRecord {
    InquiryRecord {
        id: id.to_string(),
        kind,
        title: format!("Inquiry {id}"),
        url: format!("https://sejm.test/{kind}/{id}"),
        submitters: "100, 200".to_string(),
        reply_count: replies,
        replies: (0..replies)
            .map(|i| Reply {
                key: format!("R{i}"),
                is_prolongation: i == 0,
                last_modified: format!("2024-02-0{}T10:00:00", i + 1),
                receipt_date: format!("2024-02-0{}", i + 1),
                author: "Ministry".to_string(),
            })
            .collect(),
        submission_date: Some("2024-01-15".to_string()),
    }
}
