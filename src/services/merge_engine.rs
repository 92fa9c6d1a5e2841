//! Merge engine for Tabitha.
//!
//! Folds the results of multiple independent history lookups (one per search
//! term or synonym) into a single deduplicated, count-annotated sequence.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::errors::LookupError;
use crate::types::history::{ConsolidatedRecord, RawVisit};

/// Inclusive time range for a history lookup, in epoch milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// The widest possible range.
    pub fn unbounded() -> Self {
        Self {
            start_ms: 0,
            end_ms: i64::MAX,
        }
    }
}

/// Host-supplied history lookup collaborator.
///
/// May return fewer than `max_results` entries. Result order is unspecified
/// and must not be relied upon for correctness; it only influences the
/// first-seen-wins tie-break, which is therefore host-dependent.
pub trait HistoryLookup {
    fn search(
        &self,
        term: &str,
        range: TimeRange,
        max_results: usize,
    ) -> Result<Vec<RawVisit>, LookupError>;
}

/// Accumulates raw visits into deduplicated, frequency-annotated records.
///
/// A record key maps to exactly one consolidated record; folding a repeat
/// key only increments its occurrence count. Each accumulator is single-use,
/// for one logical query — reusing one across queries would keep counting
/// into the previous result set.
pub struct MergeAccumulator {
    index: HashMap<String, usize>,
    records: Vec<ConsolidatedRecord>,
}

impl MergeAccumulator {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Folds one raw visit into the accumulator.
    ///
    /// First sight of a key inserts a record with `occurrence_count = 1` and
    /// the visit's timestamp; every repeat only increments the count. The
    /// url, title, and time of an existing record are never updated — the
    /// first-seen values win.
    pub fn fold(&mut self, visit: &RawVisit) {
        let key = visit.record_key();
        match self.index.get(&key) {
            Some(&slot) => {
                self.records[slot].occurrence_count += 1;
            }
            None => {
                self.index.insert(key.clone(), self.records.len());
                self.records.push(ConsolidatedRecord {
                    key,
                    url: visit.url.clone(),
                    title: visit.title.clone(),
                    time: visit.last_visit_time,
                    occurrence_count: 1,
                    content: None,
                });
            }
        }
    }

    /// Folds a whole lookup result list, in its given order.
    pub fn fold_all<'a>(&mut self, visits: impl IntoIterator<Item = &'a RawVisit>) {
        for visit in visits {
            self.fold(visit);
        }
    }

    /// Number of distinct record keys folded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the accumulator, yielding records in first-insertion order.
    /// The output is deterministic and is not re-sorted by count or time.
    pub fn into_records(self) -> Vec<ConsolidatedRecord> {
        self.records
    }
}

impl Default for MergeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of merging the lookups for a full term set.
///
/// A failing term contributes no records; its error rides along here so the
/// caller can surface a partial-results warning instead of an abort.
#[derive(Debug)]
pub struct MergeOutcome {
    pub records: Vec<ConsolidatedRecord>,
    pub failed_terms: Vec<(String, LookupError)>,
}

impl MergeOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed_terms.is_empty()
    }
}

/// Runs one lookup per term sequentially and folds the results in term order.
///
/// An empty term set yields an empty outcome. A term yielding zero results
/// contributes nothing.
pub fn merge_terms<L: HistoryLookup>(
    lookup: &L,
    terms: &[String],
    range: TimeRange,
    max_results: usize,
) -> MergeOutcome {
    let mut accumulator = MergeAccumulator::new();
    let mut failed_terms = Vec::new();

    for term in terms {
        match lookup.search(term, range, max_results) {
            Ok(visits) => accumulator.fold_all(&visits),
            Err(err) => failed_terms.push((term.clone(), err)),
        }
    }

    MergeOutcome {
        records: accumulator.into_records(),
        failed_terms,
    }
}

/// Runs one lookup task per term concurrently, then joins and folds the
/// results in the original term order.
///
/// The fixed join order keeps the first-seen-wins tie-break deterministic:
/// when two terms return overlapping keys with different raw field values,
/// the earlier *term* wins regardless of which task completed first.
pub async fn merge_terms_concurrent<L>(
    lookup: Arc<L>,
    terms: &[String],
    range: TimeRange,
    max_results: usize,
) -> MergeOutcome
where
    L: HistoryLookup + Send + Sync + 'static,
{
    let mut handles = Vec::with_capacity(terms.len());
    for term in terms {
        let lookup = Arc::clone(&lookup);
        let owned = term.clone();
        let handle = tokio::task::spawn_blocking(move || lookup.search(&owned, range, max_results));
        handles.push((term.clone(), handle));
    }

    let mut accumulator = MergeAccumulator::new();
    let mut failed_terms = Vec::new();

    for (term, handle) in handles {
        match handle.await {
            Ok(Ok(visits)) => accumulator.fold_all(&visits),
            Ok(Err(err)) => failed_terms.push((term, err)),
            Err(join_err) => {
                failed_terms.push((term, LookupError::Failed(join_err.to_string())));
            }
        }
    }

    MergeOutcome {
        records: accumulator.into_records(),
        failed_terms,
    }
}
