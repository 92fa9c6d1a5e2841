use serde::{Deserialize, Serialize};

/// One browser-history entry as reported by a lookup, prior to deduplication.
///
/// Multiple raw visits may describe the same real-world page visit when they
/// are returned by different lookup terms. Immutable once observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVisit {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Visit timestamp in epoch milliseconds. Host data may omit it entirely.
    #[serde(
        default,
        rename = "lastVisitTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_visit_time: Option<i64>,
    /// Externally-supplied identifier, if the host assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RawVisit {
    /// Composite dedup identity: `url` concatenated with `title`, exact and
    /// case-sensitive, with no separator and no normalization.
    ///
    /// URL alone is not enough — redirects and anchors can share a URL while
    /// rendering as distinct page states. Two raw visits collapse into one
    /// consolidated record iff their keys are equal.
    pub fn record_key(&self) -> String {
        format!("{}{}", self.url, self.title)
    }
}

/// The deduplicated unit exposed to views: one or more raw visits sharing a
/// record key, annotated with how many raw entries collapsed into it.
///
/// Created by the merge engine and mutated only while folding; callers treat
/// a returned record as a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub key: String,
    pub url: String,
    pub title: String,
    /// Best-known visit time: the first-seen `last_visit_time` for this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// How many raw entries mapped to this key, across all lookups. Never
    /// decremented.
    pub occurrence_count: u32,
    /// Optional page-content placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One record as submitted to the history store: a raw-visit-shaped object
/// optionally carrying a pre-assigned id and consolidation metadata.
///
/// `url` defaults to empty rather than failing deserialization, so a batch
/// with missing fields can be rejected with per-record positions instead of
/// one opaque parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        alias = "lastVisitTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<ConsolidatedRecord> for IngestRecord {
    fn from(record: ConsolidatedRecord) -> Self {
        Self {
            id: None,
            url: record.url,
            title: record.title,
            time: record.time,
            occurrence_count: Some(record.occurrence_count),
            content: record.content,
        }
    }
}

/// A consolidated record held by the history store, with an assigned id and
/// a table-editable title.
///
/// Ids are unique within one snapshot. An entry lives until the next full
/// snapshot replacement discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    pub occurrence_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl StoredEntry {
    /// Re-projects the entry as a raw visit, for bucketed views and
    /// store-backed lookups.
    pub fn as_raw_visit(&self) -> RawVisit {
        RawVisit {
            url: self.url.clone(),
            title: self.title.clone(),
            last_visit_time: self.time,
            id: Some(self.id.clone()),
        }
    }
}
