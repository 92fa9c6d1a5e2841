use std::fmt;

// === LookupError ===

/// Errors from an individual term's history lookup.
///
/// A failing term never aborts a merge; its contribution is skipped and the
/// failure is surfaced alongside the partial results.
#[derive(Debug)]
pub enum LookupError {
    /// The host lookup reported a failure for this term.
    Failed(String),
    /// The host lookup did not respond in time.
    Timeout(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Failed(msg) => write!(f, "History lookup failed: {}", msg),
            LookupError::Timeout(msg) => write!(f, "History lookup timed out: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

// === BucketError ===

/// Errors raised while grouping records into time buckets.
#[derive(Debug)]
pub enum BucketError {
    /// The record's URL cannot be parsed into a hostname. The record is
    /// excluded from the bucketed output but reported, never silently dropped.
    InvalidOrigin(String),
}

impl fmt::Display for BucketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketError::InvalidOrigin(url) => {
                write!(f, "Cannot derive origin from URL: {}", url)
            }
        }
    }
}

impl std::error::Error for BucketError {}

// === StoreError ===

/// Errors related to the consolidated history store.
#[derive(Debug)]
pub enum StoreError {
    /// No stored entry carries the given id.
    NotFound(String),
    /// The named field is not externally patchable.
    InvalidField(String),
    /// The ingestion batch contained invalid records and was rejected as a
    /// whole. Carries the zero-based position and reason for each failure.
    MalformedBatch(Vec<(usize, String)>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "History entry not found: {}", id),
            StoreError::InvalidField(field) => {
                write!(f, "Field is not patchable: {}", field)
            }
            StoreError::MalformedBatch(failures) => {
                let detail: Vec<String> = failures
                    .iter()
                    .map(|(index, reason)| format!("record {}: {}", index, reason))
                    .collect();
                write!(
                    f,
                    "Malformed ingest batch ({} invalid): {}",
                    failures.len(),
                    detail.join("; ")
                )
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === BookmarkError ===

/// Errors related to the bookmark sink.
#[derive(Debug)]
pub enum BookmarkError {
    /// Bookmark with the given ID was not found.
    NotFound(String),
    /// A bookmark with the same URL already exists.
    DuplicateUrl(String),
    /// The provided URL is not bookmarkable.
    InvalidUrl(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::DuplicateUrl(url) => write!(f, "Duplicate bookmark URL: {}", url),
            BookmarkError::InvalidUrl(url) => write!(f, "Invalid bookmark URL: {}", url),
        }
    }
}

impl std::error::Error for BookmarkError {}
