//! Time bucketer for Tabitha.
//!
//! Partitions a flat sequence of raw visits into composite buckets keyed by
//! `(origin, 10-minute window)` for grouped tabular display. Buckets are
//! recomputed from scratch on every pass; nothing here mutates incrementally.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use crate::types::bucket::Bucket;
use crate::types::errors::BucketError;
use crate::types::history::RawVisit;

/// Width of one grouping window: 10 minutes, in milliseconds.
pub const WINDOW_MILLIS: i64 = 10 * 60 * 1000;

/// A record excluded from the bucketed output, with the reason.
///
/// Callers keep rejected records visible in flat/unbucketed views and report
/// the diagnostic per record; a bad URL never aborts the whole batch.
#[derive(Debug)]
pub struct RejectedRecord {
    pub visit: RawVisit,
    pub error: BucketError,
}

/// Result of one bucketing pass.
#[derive(Debug)]
pub struct BucketOutcome {
    /// Buckets in creation (first-member-seen) order.
    pub buckets: Vec<Bucket>,
    pub rejected: Vec<RejectedRecord>,
}

impl BucketOutcome {
    /// All members concatenated: bucket-creation order, then insertion order
    /// within each bucket. Grouping reorders records relative to the input
    /// sequence.
    pub fn flatten(&self) -> Vec<RawVisit> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.members.iter().cloned())
            .collect()
    }

    /// Total member count across all buckets.
    pub fn member_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.members.len()).sum()
    }
}

/// Derives the origin (hostname) of a URL.
pub fn origin_of(url: &str) -> Result<String, BucketError> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .ok_or_else(|| BucketError::InvalidOrigin(url.to_string()))
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Buckets visits against the current wall clock.
pub fn bucket_visits(visits: &[RawVisit]) -> BucketOutcome {
    bucket_visits_at(visits, now_ms())
}

/// Buckets visits against an explicit "now".
///
/// A missing or non-positive timestamp is anchored to `now_ms`: such records
/// fall into the current window, they are not excluded. Records whose URL
/// yields no hostname are reported in `rejected` instead of being grouped.
///
/// A member lacking an id is assigned `bucket_key + "-" + position` within
/// its bucket, which is unique across the whole pass and store-assignable.
pub fn bucket_visits_at(visits: &[RawVisit], now_ms: i64) -> BucketOutcome {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for visit in visits {
        let origin = match origin_of(&visit.url) {
            Ok(origin) => origin,
            Err(error) => {
                rejected.push(RejectedRecord {
                    visit: visit.clone(),
                    error,
                });
                continue;
            }
        };

        let timestamp = visit.last_visit_time.filter(|&t| t > 0).unwrap_or(now_ms);
        let window_index = timestamp / WINDOW_MILLIS;
        let key = format!("{}-{}", origin, window_index);

        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    id: key.clone(),
                    origin,
                    window_start: window_index * WINDOW_MILLIS,
                    members: Vec::new(),
                });
                buckets.len() - 1
            }
        };

        let mut member = visit.clone();
        if member.id.as_deref().map_or(true, str::is_empty) {
            member.id = Some(format!("{}-{}", key, buckets[slot].members.len()));
        }
        buckets[slot].members.push(member);
    }

    BucketOutcome { buckets, rejected }
}
