//! Tabitha — a browser-history intelligence engine.
//!
//! Entry point: runs an interactive console demo walking through every
//! component with sample data. The real integration surface is the
//! `tabitha-rpc` binary.

use tabitha::managers::bookmark_store::{BookmarkSink, BookmarkStore};
use tabitha::managers::history_store::{HistoryStore, HistoryStoreTrait};
use tabitha::services::insights_engine::{InsightsEngine, InsightsEngineTrait};
use tabitha::services::merge_engine::{merge_terms, TimeRange};
use tabitha::services::store_lookup::StoreLookup;
use tabitha::services::time_bucketer::bucket_visits_at;
use tabitha::types::history::{IngestRecord, RawVisit};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Tabitha v{} — Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║      Browser-history consolidation and intelligence          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_merge();
    demo_bucketer();
    demo_store();
    demo_insights();
    demo_bookmarks();

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn sample_visits() -> Vec<RawVisit> {
    let mk = |url: &str, title: &str, time: i64| RawVisit {
        url: url.to_string(),
        title: title.to_string(),
        last_visit_time: Some(time),
        id: None,
    };
    vec![
        mk("https://rust-lang.org/", "Rust", 1_700_000_000_000),
        mk("https://rust-lang.org/learn", "Learn Rust", 1_700_000_120_000),
        mk("https://docs.rs/serde", "serde - Rust", 1_700_000_300_000),
        mk("https://rust-lang.org/", "Rust", 1_700_003_600_000),
        mk("https://news.ycombinator.com/", "Hacker News", 1_700_003_700_000),
    ]
}

fn demo_merge() {
    section("Merge Engine");

    let mut store = HistoryStore::new();
    let records: Vec<IngestRecord> = sample_visits()
        .iter()
        .map(|v| IngestRecord {
            url: v.url.clone(),
            title: v.title.clone(),
            time: v.last_visit_time,
            ..Default::default()
        })
        .collect();
    store.replace_all(records).expect("sample batch is valid");

    let lookup = StoreLookup::from_entries(&store.get_all());
    let terms = vec!["rust".to_string(), "serde".to_string()];
    let outcome = merge_terms(&lookup, &terms, TimeRange::unbounded(), 100);

    println!("  Merged {} terms into {} consolidated records:", terms.len(), outcome.records.len());
    for record in &outcome.records {
        println!("    ×{}  {}  ({})", record.occurrence_count, record.title, record.url);
    }
    println!("  ✓ Merge engine OK");
    println!();
}

fn demo_bucketer() {
    section("Time Bucketer");

    let outcome = bucket_visits_at(&sample_visits(), 1_700_010_000_000);
    println!("  Grouped {} visits into {} buckets:", outcome.member_count(), outcome.buckets.len());
    for bucket in &outcome.buckets {
        println!("    {}  — {} member(s)", bucket.id, bucket.members.len());
    }
    println!("  ✓ Time bucketer OK");
    println!();
}

fn demo_store() {
    section("History Store");

    let mut store = HistoryStore::new();
    store
        .replace_all(vec![
            IngestRecord {
                url: "https://example.com".to_string(),
                title: "Example".to_string(),
                ..Default::default()
            },
            IngestRecord {
                id: Some("custom".to_string()),
                url: "https://rust-lang.org".to_string(),
                title: "Rust".to_string(),
                ..Default::default()
            },
        ])
        .expect("sample batch is valid");

    store
        .patch_field("0", "title", "Example (renamed)")
        .expect("entry 0 exists");

    let entries = store.get_all();
    for entry in &entries {
        println!("    [{}] {}", entry.id, entry.title);
    }
    println!("  ✓ History store OK");
    println!();
}

fn demo_insights() {
    section("Insights Engine");

    let mut store = HistoryStore::new();
    let records: Vec<IngestRecord> = sample_visits()
        .iter()
        .map(|v| IngestRecord {
            url: v.url.clone(),
            title: v.title.clone(),
            time: v.last_visit_time,
            ..Default::default()
        })
        .collect();
    store.replace_all(records).expect("sample batch is valid");

    let insights = InsightsEngine::new().compute(&store.get_all());
    println!("  Top domains:");
    for (domain, count) in &insights.top_domains {
        println!("    {} — {} visit(s)", domain, count);
    }
    println!("  {} back-to-back sequence(s) observed", insights.common_sequences.len());
    println!("  ✓ Insights engine OK");
    println!();
}

fn demo_bookmarks() {
    section("Bookmark Sink");

    let mut bookmarks = BookmarkStore::new();
    let id = bookmarks
        .create("Rust", "https://rust-lang.org")
        .expect("fresh store has no duplicates");
    println!("  Created bookmark {}", id);
    println!("  exists(rust-lang.org) = {}", bookmarks.exists("https://rust-lang.org"));
    println!("  ✓ Bookmark sink OK");
    println!();
}
