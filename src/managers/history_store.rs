//! Consolidated history store for Tabitha.
//!
//! Implements `HistoryStoreTrait` — an addressable in-memory collection with
//! snapshot-replace, read-all, and single-field patch-by-id. The store is an
//! owned, injectable object (not process-wide state) so tests run isolated
//! instances; the RPC boundary serializes writers through a `Mutex`.

use crate::types::errors::StoreError;
use crate::types::history::{IngestRecord, StoredEntry};

/// Fields the table surface may patch. Structural fields (`id`, `url`) are
/// never patchable.
pub const PATCHABLE_FIELDS: &[&str] = &["title", "content"];

/// Trait defining consolidated-store operations.
pub trait HistoryStoreTrait {
    /// Replaces the whole collection. All-or-nothing: a batch with invalid
    /// records is rejected before any previous state is discarded. Returns
    /// the stored entry count.
    fn replace_all(&mut self, records: Vec<IngestRecord>) -> Result<usize, StoreError>;
    /// Current collection in stored order, as a cloned snapshot. Later
    /// mutations are not visible without re-calling.
    fn get_all(&self) -> Vec<StoredEntry>;
    /// Sets one allow-listed field on the first entry whose id matches.
    fn patch_field(&mut self, id: &str, field: &str, value: &str) -> Result<(), StoreError>;
    fn entry_count(&self) -> usize;
}

/// In-memory consolidated history store.
pub struct HistoryStore {
    entries: Vec<StoredEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Validates an ingest batch. Every record must carry a non-empty `url`.
    fn validate(records: &[IngestRecord]) -> Vec<(usize, String)> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.url.is_empty())
            .map(|(index, _)| (index, "missing url".to_string()))
            .collect()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStoreTrait for HistoryStore {
    /// Replaces the collection with the given records.
    ///
    /// Each entry's id is the supplied id when present and non-empty, else
    /// its zero-based position as a string. No deduplication happens here —
    /// two identical records become two entries.
    fn replace_all(&mut self, records: Vec<IngestRecord>) -> Result<usize, StoreError> {
        let failures = Self::validate(&records);
        if !failures.is_empty() {
            return Err(StoreError::MalformedBatch(failures));
        }

        self.entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| StoredEntry {
                id: record
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| index.to_string()),
                url: record.url,
                title: record.title,
                time: record.time,
                occurrence_count: record.occurrence_count.unwrap_or(1),
                content: record.content,
            })
            .collect();

        Ok(self.entries.len())
    }

    fn get_all(&self) -> Vec<StoredEntry> {
        self.entries.clone()
    }

    /// Patches one field on the first entry whose id matches.
    ///
    /// The field name is validated against `PATCHABLE_FIELDS` first, so a
    /// patch can never corrupt `id` or `url`. Setting the same value twice
    /// leaves the store unchanged.
    fn patch_field(&mut self, id: &str, field: &str, value: &str) -> Result<(), StoreError> {
        if !PATCHABLE_FIELDS.contains(&field) {
            return Err(StoreError::InvalidField(field.to_string()));
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        match field {
            "title" => entry.title = value.to_string(),
            "content" => entry.content = Some(value.to_string()),
            _ => unreachable!("field checked against allow-list"),
        }
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
