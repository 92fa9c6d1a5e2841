use serde::Serialize;

use crate::types::history::RawVisit;

/// A group of records sharing the same origin and 10-minute time window,
/// used for tabular grouping.
///
/// Buckets are created lazily, only when a first member arrives, so
/// `members` is non-empty by construction. Member order is first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    /// Synthetic id: `origin + "-" + window_index`.
    pub id: String,
    /// Hostname portion of the members' URL.
    pub origin: String,
    /// Start of the window, epoch milliseconds.
    pub window_start: i64,
    pub members: Vec<RawVisit>,
}
