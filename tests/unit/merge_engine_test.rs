//! Unit tests for the merge engine public API.
//!
//! These tests exercise dedup folding, occurrence counting, first-seen-wins
//! semantics, and partial-results behavior through the `HistoryLookup`
//! interface, using a scripted mock lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tabitha::services::merge_engine::{
    merge_terms, merge_terms_concurrent, HistoryLookup, MergeAccumulator, TimeRange,
};
use tabitha::types::errors::LookupError;
use tabitha::types::history::RawVisit;

fn visit(url: &str, title: &str, time: Option<i64>) -> RawVisit {
    RawVisit {
        url: url.to_string(),
        title: title.to_string(),
        last_visit_time: time,
        id: None,
    }
}

/// Scripted lookup: fixed results per term, plus a set of failing terms.
struct MockLookup {
    responses: HashMap<String, Vec<RawVisit>>,
    failing: HashSet<String>,
}

impl MockLookup {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    fn with_term(mut self, term: &str, visits: Vec<RawVisit>) -> Self {
        self.responses.insert(term.to_string(), visits);
        self
    }

    fn with_failing_term(mut self, term: &str) -> Self {
        self.failing.insert(term.to_string());
        self
    }
}

impl HistoryLookup for MockLookup {
    fn search(
        &self,
        term: &str,
        _range: TimeRange,
        max_results: usize,
    ) -> Result<Vec<RawVisit>, LookupError> {
        if self.failing.contains(term) {
            return Err(LookupError::Failed("scripted failure".to_string()));
        }
        Ok(self
            .responses
            .get(term)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .collect())
    }
}

fn terms(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// === MergeAccumulator ===

/// Two raw visits with equal url and title collapse into one record whose
/// occurrence count equals the number of such visits.
#[test]
fn equal_keys_collapse_into_one_record() {
    let mut acc = MergeAccumulator::new();
    acc.fold(&visit("https://a.com", "A", Some(100)));
    acc.fold(&visit("https://a.com", "A", Some(200)));
    acc.fold(&visit("https://a.com", "A", None));

    let records = acc.into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].occurrence_count, 3);
}

/// Same URL with different titles stays distinct — the key is url + title.
#[test]
fn same_url_different_title_stays_distinct() {
    let mut acc = MergeAccumulator::new();
    acc.fold(&visit("https://a.com", "Home", None));
    acc.fold(&visit("https://a.com", "Home — after redirect", None));

    assert_eq!(acc.len(), 2);
}

/// First-seen url/title/time win; repeats only bump the count.
#[test]
fn first_seen_values_win_on_repeat() {
    let mut acc = MergeAccumulator::new();
    acc.fold(&visit("x", "x", Some(100)));
    acc.fold(&visit("x", "x", Some(200)));

    let records = acc.into_records();
    assert_eq!(records[0].time, Some(100));
    assert_eq!(records[0].occurrence_count, 2);
}

/// Output preserves first-insertion order, not count or time order.
#[test]
fn output_is_in_first_insertion_order() {
    let mut acc = MergeAccumulator::new();
    acc.fold(&visit("https://b.com", "B", Some(900)));
    acc.fold(&visit("https://a.com", "A", Some(100)));
    acc.fold(&visit("https://a.com", "A", Some(100)));
    acc.fold(&visit("https://c.com", "C", Some(500)));

    let records = acc.into_records();
    let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://b.com", "https://a.com", "https://c.com"]);
}

/// A missing timestamp passes through unvalidated.
#[test]
fn missing_time_is_preserved_as_none() {
    let mut acc = MergeAccumulator::new();
    acc.fold(&visit("https://a.com", "A", None));
    assert_eq!(acc.into_records()[0].time, None);
}

// === merge_terms ===

/// N terms each redundantly returning the same record yield a count of
/// exactly N — never double-counted, never under-counted.
#[test]
fn count_is_exact_across_redundant_terms() {
    let shared = visit("https://a.com", "A", Some(100));
    let lookup = MockLookup::new()
        .with_term("one", vec![shared.clone()])
        .with_term("two", vec![shared.clone()])
        .with_term("three", vec![shared.clone()]);

    let outcome = merge_terms(
        &lookup,
        &terms(&["one", "two", "three"]),
        TimeRange::unbounded(),
        100,
    );

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].occurrence_count, 3);
    assert!(!outcome.is_partial());
}

/// Term A's values win over term B's for an overlapping key, because terms
/// fold in order.
#[test]
fn earlier_term_wins_overlapping_key() {
    let lookup = MockLookup::new()
        .with_term("a", vec![visit("x", "x", Some(100))])
        .with_term("b", vec![visit("x", "x", Some(200))]);

    let outcome = merge_terms(&lookup, &terms(&["a", "b"]), TimeRange::unbounded(), 100);

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].time, Some(100));
    assert_eq!(outcome.records[0].occurrence_count, 2);
}

/// A term yielding zero results contributes nothing; an empty term set
/// yields an empty outcome.
#[test]
fn empty_inputs_yield_empty_outcomes() {
    let lookup = MockLookup::new().with_term("hit", vec![visit("https://a.com", "A", None)]);

    let outcome = merge_terms(
        &lookup,
        &terms(&["hit", "miss"]),
        TimeRange::unbounded(),
        100,
    );
    assert_eq!(outcome.records.len(), 1);

    let empty = merge_terms(&lookup, &[], TimeRange::unbounded(), 100);
    assert!(empty.records.is_empty());
    assert!(!empty.is_partial());
}

/// A failing term is skipped; the rest still merge and the failure is
/// reported as a warning rather than aborting the query.
#[test]
fn failing_term_produces_partial_results() {
    let lookup = MockLookup::new()
        .with_term("good", vec![visit("https://a.com", "A", Some(1))])
        .with_failing_term("bad");

    let outcome = merge_terms(
        &lookup,
        &terms(&["good", "bad"]),
        TimeRange::unbounded(),
        100,
    );

    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.is_partial());
    assert_eq!(outcome.failed_terms.len(), 1);
    assert_eq!(outcome.failed_terms[0].0, "bad");
}

/// Duplicate entries within a single term's result list are each counted.
#[test]
fn duplicates_within_one_term_are_counted() {
    let v = visit("https://a.com", "A", Some(1));
    let lookup = MockLookup::new().with_term("t", vec![v.clone(), v.clone(), v]);

    let outcome = merge_terms(&lookup, &terms(&["t"]), TimeRange::unbounded(), 100);
    assert_eq!(outcome.records[0].occurrence_count, 3);
}

// === merge_terms_concurrent ===

/// Slow-completing lookup: stalls so a later term finishes first.
struct SlowFirstLookup;

impl HistoryLookup for SlowFirstLookup {
    fn search(
        &self,
        term: &str,
        _range: TimeRange,
        _max_results: usize,
    ) -> Result<Vec<RawVisit>, LookupError> {
        match term {
            "slow" => {
                std::thread::sleep(std::time::Duration::from_millis(50));
                Ok(vec![visit("x", "x", Some(100))])
            }
            _ => Ok(vec![visit("x", "x", Some(200))]),
        }
    }
}

/// Concurrent dispatch joins in term order, so the earlier term's values
/// win even when its lookup completes last.
#[tokio::test]
async fn concurrent_merge_joins_in_term_order() {
    let lookup = Arc::new(SlowFirstLookup);
    let outcome =
        merge_terms_concurrent(lookup, &terms(&["slow", "fast"]), TimeRange::unbounded(), 100)
            .await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].time, Some(100));
    assert_eq!(outcome.records[0].occurrence_count, 2);
}

/// Concurrent dispatch carries failed terms the same way the sequential
/// driver does.
#[tokio::test]
async fn concurrent_merge_reports_failed_terms() {
    let lookup = Arc::new(
        MockLookup::new()
            .with_term("good", vec![visit("https://a.com", "A", None)])
            .with_failing_term("bad"),
    );
    let outcome =
        merge_terms_concurrent(lookup, &terms(&["good", "bad"]), TimeRange::unbounded(), 100)
            .await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.failed_terms.len(), 1);
    assert_eq!(outcome.failed_terms[0].0, "bad");
}
