//! Insights engine for Tabitha.
//!
//! Aggregates the stored history snapshot into the figures the insights
//! surface consumes: domain rankings, hourly histograms, weekday/weekend
//! splits, and back-to-back visit sequences. Rendering is the caller's job.

use std::collections::{BTreeMap, HashMap};

use crate::services::time_bucketer::origin_of;
use crate::types::history::StoredEntry;
use crate::types::insight::{BrowsingInsights, DomainTransition, HourlyCount};

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;
// 1970-01-01 was a Thursday; day-of-week 0 is Sunday.
const EPOCH_WEEKDAY: i64 = 4;

/// Trait defining insight computation over a history snapshot.
pub trait InsightsEngineTrait {
    fn compute(&self, entries: &[StoredEntry]) -> BrowsingInsights;
}

/// Stateless insights engine with configurable ranking cutoffs.
pub struct InsightsEngine {
    top_limit: usize,
    sequence_limit: usize,
}

impl InsightsEngine {
    pub fn new() -> Self {
        Self {
            top_limit: 8,
            sequence_limit: 10,
        }
    }

    pub fn with_limits(top_limit: usize, sequence_limit: usize) -> Self {
        Self {
            top_limit,
            sequence_limit,
        }
    }

    fn weekday_utc(timestamp_ms: i64) -> i64 {
        (timestamp_ms.div_euclid(MS_PER_DAY) + EPOCH_WEEKDAY).rem_euclid(7)
    }

    fn hour_utc(timestamp_ms: i64) -> u8 {
        timestamp_ms.div_euclid(MS_PER_HOUR).rem_euclid(24) as u8
    }

    fn is_weekend(timestamp_ms: i64) -> bool {
        let weekday = Self::weekday_utc(timestamp_ms);
        weekday == 0 || weekday == 6
    }

    /// Descending by count, ties alphabetical, truncated to `limit`.
    fn ranked(counts: HashMap<String, u32>, limit: usize) -> Vec<(String, u32)> {
        let mut pairs: Vec<(String, u32)> = counts.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        pairs.truncate(limit);
        pairs
    }
}

impl Default for InsightsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightsEngineTrait for InsightsEngine {
    /// Computes all insight figures in one pass over the snapshot.
    ///
    /// Entries whose URL yields no hostname are skipped everywhere; entries
    /// without a timestamp still count toward `top_domains` but are skipped
    /// by the time-based figures.
    fn compute(&self, entries: &[StoredEntry]) -> BrowsingInsights {
        let mut domain_counts: HashMap<String, u32> = HashMap::new();
        let mut weekday_counts: HashMap<String, u32> = HashMap::new();
        let mut weekend_counts: HashMap<String, u32> = HashMap::new();
        let mut hourly: BTreeMap<String, [u32; 24]> = BTreeMap::new();
        let mut timed: Vec<(i64, String)> = Vec::new();

        for entry in entries {
            let origin = match origin_of(&entry.url) {
                Ok(origin) => origin,
                Err(_) => continue,
            };

            *domain_counts.entry(origin.clone()).or_insert(0) += 1;

            if let Some(time) = entry.time.filter(|&t| t > 0) {
                if Self::is_weekend(time) {
                    *weekend_counts.entry(origin.clone()).or_insert(0) += 1;
                } else {
                    *weekday_counts.entry(origin.clone()).or_insert(0) += 1;
                }
                hourly.entry(origin.clone()).or_insert([0; 24])
                    [Self::hour_utc(time) as usize] += 1;
                timed.push((time, origin));
            }
        }

        // Back-to-back transitions in visit-time order, across differing
        // origins only.
        timed.sort_by_key(|(time, _)| *time);
        let mut transition_counts: HashMap<(String, String), u32> = HashMap::new();
        for pair in timed.windows(2) {
            let from = &pair[0].1;
            let to = &pair[1].1;
            if from != to {
                *transition_counts
                    .entry((from.clone(), to.clone()))
                    .or_insert(0) += 1;
            }
        }
        let mut common_sequences: Vec<DomainTransition> = transition_counts
            .into_iter()
            .map(|((from, to), count)| DomainTransition { from, to, count })
            .collect();
        common_sequences.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.from.cmp(&b.from))
                .then_with(|| a.to.cmp(&b.to))
        });
        common_sequences.truncate(self.sequence_limit);

        let hourly_visits = hourly
            .into_iter()
            .map(|(origin, slots)| {
                let histogram = slots
                    .iter()
                    .enumerate()
                    .map(|(hour, &count)| HourlyCount {
                        hour: hour as u8,
                        count,
                    })
                    .collect();
                (origin, histogram)
            })
            .collect();

        BrowsingInsights {
            top_domains: Self::ranked(domain_counts, self.top_limit),
            hourly_visits,
            weekday_top: Self::ranked(weekday_counts, self.top_limit),
            weekend_top: Self::ranked(weekend_counts, self.top_limit),
            common_sequences,
        }
    }
}
