//! Store-backed implementation of the `HistoryLookup` contract.
//!
//! The host environment normally supplies the lookup; over the RPC boundary
//! the only history available is the ingested snapshot, so the search surface
//! runs its term merges against the store instead.

use crate::services::merge_engine::{HistoryLookup, TimeRange};
use crate::types::errors::LookupError;
use crate::types::history::{RawVisit, StoredEntry};

/// A `HistoryLookup` over a captured store snapshot.
pub struct StoreLookup {
    visits: Vec<RawVisit>,
}

impl StoreLookup {
    /// Captures the given entries as raw visits.
    pub fn from_entries(entries: &[StoredEntry]) -> Self {
        Self {
            visits: entries.iter().map(StoredEntry::as_raw_visit).collect(),
        }
    }
}

impl HistoryLookup for StoreLookup {
    /// Case-insensitive substring match on title and URL, bounded by the
    /// time range and result cap. An empty term matches every visit, the way
    /// the host history API treats an empty query. Visits without a
    /// timestamp always fall inside the range.
    fn search(
        &self,
        term: &str,
        range: TimeRange,
        max_results: usize,
    ) -> Result<Vec<RawVisit>, LookupError> {
        let needle = term.to_lowercase();
        let matches = self
            .visits
            .iter()
            .filter(|visit| {
                let in_range = visit
                    .last_visit_time
                    .map_or(true, |t| t >= range.start_ms && t <= range.end_ms);
                let hits = needle.is_empty()
                    || visit.title.to_lowercase().contains(&needle)
                    || visit.url.to_lowercase().contains(&needle);
                in_range && hits
            })
            .take(max_results)
            .cloned()
            .collect();
        Ok(matches)
    }
}
