//! Scan Property Tests
//!
//! End-to-end properties of scans over real files:
//! - Every well-formed data row is returned exactly once, in file order
//! - Repeated scans on one session return identical results
//! - Pages partition the matches
//! - Duplicate field names coalesce into a sequence
//! - A matching OR group accepts the row outright
//! - Count mode reports the size of the requested page
//! - Short rows are skipped, ids still follow physical lines

use csvquery::executor::{FieldValue, ScanOutcome};
use csvquery::query::{ConditionTree, QueryDescription};
use csvquery::schema::FieldSchema;
use csvquery::source::{SourceConfig, SourceSession};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const PEOPLE: &str = "\
id;name;city;age
1;Ann;Paris;34
2;Bob;Berlin;27
3;Cid;Paris;41
4;Dee;Rome;19
5;Eve;Paris;52
6;Fay;Berlin;38
";

fn setup(contents: &str, fields: &[&str]) -> (TempDir, SourceSession) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("people.csv"), contents).unwrap();

    let config = SourceConfig::with_path(tmp.path())
        .table("people", FieldSchema::new(fields).unwrap());
    let session = SourceSession::open(config).unwrap();
    (tmp, session)
}

fn people() -> (TempDir, SourceSession) {
    setup(PEOPLE, &["pk", "name", "city", "age"])
}

fn query_json(session: &mut SourceSession, request: serde_json::Value) -> Vec<u64> {
    let query = QueryDescription::from_json(&request).unwrap();
    session
        .read_table("people", &query)
        .unwrap()
        .outcome
        .into_records()
        .iter()
        .map(|r| r.id())
        .collect()
}

// =============================================================================
// Row Count and Order
// =============================================================================

/// Empty conditions return every well-formed data row in file order.
#[test]
fn test_all_rows_returned_in_order() {
    let (_tmp, mut session) = people();
    let ids = query_json(&mut session, json!({}));
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

/// Header-only file yields nothing.
#[test]
fn test_header_only_file() {
    let (_tmp, mut session) = setup("a;b\n", &["a", "b"]);
    let output = session.read_table("people", &QueryDescription::new()).unwrap();
    assert_eq!(output.outcome.count(), 0);
    assert_eq!(output.stats.lines_read, 1);
}

/// A blank line is a one-cell row: a record under a one-field schema.
#[test]
fn test_blank_line_is_a_row() {
    let (_tmp, mut session) = setup("n\n1\n\n3\n", &["n"]);
    let output = session.read_table("people", &QueryDescription::new()).unwrap();

    assert_eq!(
        serde_json::to_value(output.outcome.records().unwrap()).unwrap(),
        json!([{"id": 1, "n": "1"}, {"id": 2, "n": ""}, {"id": 3, "n": "3"}])
    );
    assert_eq!(output.stats.malformed, 0);
}

/// Under a wider schema a blank line is malformed and later ids do not shift.
#[test]
fn test_blank_line_malformed_under_wide_schema() {
    let (_tmp, mut session) = setup("a;b\n1;x\n\n\n4;y\n", &["a", "b"]);
    let output = session.read_table("people", &QueryDescription::new()).unwrap();

    let ids: Vec<u64> = output.outcome.records().unwrap().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(output.stats.malformed, 2);
    assert_eq!(output.stats.returned, output.stats.lines_read - 1 - output.stats.malformed);
}

/// Windows line endings number rows the same as Unix ones.
#[test]
fn test_crlf_file_ids() {
    let (_tmp, mut session) = setup("a;b\r\n1;x\r\n2;z\r\n3;w\r\n", &["a", "b"]);
    let output = session.read_table("people", &QueryDescription::new()).unwrap();

    assert_eq!(
        serde_json::to_value(output.outcome.records().unwrap()).unwrap(),
        json!([
            {"id": 1, "a": "1", "b": "x"},
            {"id": 2, "a": "2", "b": "z"},
            {"id": 3, "a": "3", "b": "w"}
        ])
    );
}

// =============================================================================
// Idempotence
// =============================================================================

/// The same query twice on one session returns identical results.
#[test]
fn test_repeated_scans_identical() {
    let (_tmp, mut session) = people();
    let query = QueryDescription::from_json(&json!({"conditions": {"city": "Paris"}})).unwrap();

    let first = session.read_table("people", &query).unwrap();
    for _ in 0..10 {
        let again = session.read_table("people", &query).unwrap();
        assert_eq!(again.outcome, first.outcome);
    }
    assert_eq!(session.metrics().cursors_opened, 1);
}

/// A scan that stopped early does not leave the next scan mid-file.
#[test]
fn test_rewind_after_early_stop() {
    let (_tmp, mut session) = people();

    let first = query_json(&mut session, json!({"limit": 1}));
    assert_eq!(first, vec![1]);

    let all = query_json(&mut session, json!({"limit": 100}));
    assert_eq!(all, vec![1, 2, 3, 4, 5, 6]);
}

// =============================================================================
// Pagination
// =============================================================================

/// Concatenating pages 1..=k gives the first k*limit matches.
#[test]
fn test_pages_partition_matches() {
    let (_tmp, mut session) = people();
    let everything = query_json(&mut session, json!({"conditions": {"age >": 20}, "limit": 100}));
    assert_eq!(everything, vec![1, 2, 3, 5, 6]);

    let mut paged = Vec::new();
    for page in 1..=3 {
        paged.extend(query_json(
            &mut session,
            json!({"conditions": {"age >": 20}, "limit": 2, "page": page}),
        ));
    }
    assert_eq!(paged, everything);
}

/// A full page stops the scan before the end of the file.
#[test]
fn test_early_termination() {
    let (_tmp, mut session) = people();
    let query = QueryDescription::new().limit(2);
    let output = session.read_table("people", &query).unwrap();

    assert!(output.stats.stopped_at_limit);
    assert_eq!(output.stats.lines_read, 3);
}

/// Unset page and limit reuse the previous scan's window until reset.
#[test]
fn test_window_sticky_until_reset() {
    let (_tmp, mut session) = people();

    assert_eq!(query_json(&mut session, json!({"limit": 2, "page": 2})), vec![3, 4]);
    assert_eq!(query_json(&mut session, json!({})), vec![3, 4]);

    session.reset_window();
    assert_eq!(query_json(&mut session, json!({})).len(), 6);
}

/// Non-positive page and limit are ignored.
#[test]
fn test_non_positive_window_values_ignored() {
    let (_tmp, mut session) = people();
    let ids = query_json(&mut session, json!({"limit": 0, "page": -3}));
    assert_eq!(ids.len(), 6);
}

// =============================================================================
// Conditions
// =============================================================================

/// Numeric ordering comparisons.
#[test]
fn test_numeric_comparisons() {
    let (_tmp, mut session) = people();
    assert_eq!(query_json(&mut session, json!({"conditions": {"age >=": 41}})), vec![3, 5]);
    assert_eq!(query_json(&mut session, json!({"conditions": {"age <": 27}})), vec![4]);
}

/// List values mean IN and NOT IN.
#[test]
fn test_in_and_not_in() {
    let (_tmp, mut session) = people();
    assert_eq!(
        query_json(&mut session, json!({"conditions": {"name": ["Bob", "Dee"]}})),
        vec![2, 4]
    );
    assert_eq!(
        query_json(&mut session, json!({"conditions": {"city !=": ["Paris", "Berlin"]}})),
        vec![4]
    );
}

/// LIKE with wildcards.
#[test]
fn test_like() {
    let (_tmp, mut session) = people();
    assert_eq!(
        query_json(&mut session, json!({"conditions": {"city LIKE": "%er%"}})),
        vec![2, 6]
    );
}

/// The synthetic id is filterable when the schema has no id field.
#[test]
fn test_filter_on_synthetic_id() {
    let (_tmp, mut session) = people();
    assert_eq!(query_json(&mut session, json!({"conditions": {"id >": 4}})), vec![5, 6]);
}

/// A matching OR group accepts the row without checking later entries.
#[test]
fn test_or_group_short_circuits() {
    let (_tmp, mut session) = people();

    let ids = query_json(
        &mut session,
        json!({"conditions": {"or": {"name": "Bob", "age": 19}, "city": "Paris"}}),
    );
    assert_eq!(ids, vec![2, 4]);
}

/// Entries before an OR group still filter.
#[test]
fn test_and_then_or() {
    let (_tmp, mut session) = people();
    let ids = query_json(
        &mut session,
        json!({"conditions": {"city": "Berlin", "or": {"name": "Fay", "age": 99}}}),
    );
    assert_eq!(ids, vec![6]);
}

/// A list of objects under OR is a disjunction of conjunctions.
#[test]
fn test_or_of_and_groups() {
    let (_tmp, mut session) = people();
    let ids = query_json(
        &mut session,
        json!({"conditions": {"or": [
            {"city": "Paris", "age >": 40},
            {"city": "Rome"}
        ]}}),
    );
    assert_eq!(ids, vec![3, 4, 5]);
}

// =============================================================================
// Records
// =============================================================================

/// Fields sharing a name coalesce into a sequence in schema order.
#[test]
fn test_duplicate_fields_coalesce() {
    let (_tmp, mut session) = setup("a;b;c\nx;y;Ann\nz;w;Bob\n", &["tag", "tag", "name"]);

    let query = QueryDescription::new().filter(ConditionTree::new().eq("tag", "y"));
    let records = session.read_table("people", &query).unwrap().outcome.into_records();

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("tag"),
        Some(&FieldValue::Multi(vec!["x".to_string(), "y".to_string()]))
    );
    assert_eq!(
        serde_json::to_value(&records[0]).unwrap(),
        json!({"id": 1, "tag": ["x", "y"], "name": "Ann"})
    );
}

/// Projection keeps schema order and the id.
#[test]
fn test_projection() {
    let (_tmp, mut session) = people();
    let query = QueryDescription::from_json(&json!({
        "fields": ["age", "name"],
        "conditions": {"name": "Cid"}
    }))
    .unwrap();
    let records = session.read_table("people", &query).unwrap().outcome.into_records();

    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([{"id": 3, "name": "Cid", "age": "41"}])
    );
}

/// Short rows are skipped and counted.
#[test]
fn test_malformed_rows_skipped() {
    let (_tmp, mut session) = setup("a;b;c\n1;2;3\n4;5\n6\n7;8;9\n", &["a", "b", "c"]);
    let output = session.read_table("people", &QueryDescription::new()).unwrap();

    let ids: Vec<u64> = output.outcome.records().unwrap().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(output.stats.malformed, 2);
    assert_eq!(session.metrics().rows_malformed, 2);
}

// =============================================================================
// Count Mode
// =============================================================================

/// Count mode reports the page size, not the total match count.
#[test]
fn test_count_is_page_size() {
    let body: String = (1..=10).map(|i| format!("{}\n", i)).collect();
    let (_tmp, mut session) = setup(&format!("n\n{}", body), &["n"]);

    let query = QueryDescription::new().limit(3).page(2).count_only();
    let output = session.read_table("people", &query).unwrap();
    assert_eq!(output.outcome, ScanOutcome::Count(3));

    let query = QueryDescription::new().limit(3).page(4).count_only();
    let output = session.read_table("people", &query).unwrap();
    assert_eq!(output.outcome, ScanOutcome::Count(1));
    assert_eq!(output.outcome.to_json(), json!({"count": 1}));
}
