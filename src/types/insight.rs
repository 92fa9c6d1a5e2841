use std::collections::BTreeMap;

use serde::Serialize;

/// Visit count for one UTC hour slot.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyCount {
    pub hour: u8,
    pub count: u32,
}

/// A back-to-back domain transition observed in time order.
#[derive(Debug, Clone, Serialize)]
pub struct DomainTransition {
    pub from: String,
    pub to: String,
    pub count: u32,
}

/// Aggregated browsing insights computed over the stored history snapshot.
///
/// Domain rankings are `(origin, visit count)` pairs in descending count
/// order; ties break alphabetically so the output is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsingInsights {
    pub top_domains: Vec<(String, u32)>,
    /// Per-domain 24-slot visit histogram (UTC hours).
    pub hourly_visits: BTreeMap<String, Vec<HourlyCount>>,
    pub weekday_top: Vec<(String, u32)>,
    pub weekend_top: Vec<(String, u32)>,
    pub common_sequences: Vec<DomainTransition>,
}
