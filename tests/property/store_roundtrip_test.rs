//! Property-based tests for the consolidated history store.
//!
//! These tests verify id assignment, ordering, atomic validation, and patch
//! idempotence for arbitrary valid and invalid batches.

use proptest::prelude::*;

use tabitha::managers::history_store::{HistoryStore, HistoryStoreTrait};
use tabitha::types::history::IngestRecord;

fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,12}",
        prop_oneof![Just(".com"), Just(".org"), Just(".io")],
    )
        .prop_map(|(scheme, host, tld)| format!("{}://{}{}", scheme, host, tld))
}

fn arb_record() -> impl Strategy<Value = IngestRecord> {
    (
        arb_url(),
        "[a-zA-Z0-9 ]{0,20}",
        proptest::option::of(1i64..2_000_000_000_000),
    )
        .prop_map(|(url, title, time)| IngestRecord {
            url,
            title,
            time,
            ..Default::default()
        })
}

proptest! {
    /// Replacing then reading returns the same number of entries, in input
    /// order, with unique positional ids.
    #[test]
    fn replace_then_read_preserves_order_and_ids(
        records in proptest::collection::vec(arb_record(), 0..40)
    ) {
        let mut store = HistoryStore::new();
        store.replace_all(records.clone()).unwrap();
        let entries = store.get_all();

        prop_assert_eq!(entries.len(), records.len());
        for (index, (entry, record)) in entries.iter().zip(&records).enumerate() {
            prop_assert_eq!(&entry.id, &index.to_string());
            prop_assert_eq!(&entry.url, &record.url);
            prop_assert_eq!(&entry.title, &record.title);
            prop_assert_eq!(entry.time, record.time);
        }

        let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), entries.len());
    }

    /// A batch containing any record without a url leaves the previous
    /// snapshot untouched.
    #[test]
    fn invalid_batch_never_mutates(
        good in proptest::collection::vec(arb_record(), 1..10),
        bad_positions in proptest::collection::btree_set(0usize..10, 1..4),
        mut batch in proptest::collection::vec(arb_record(), 10..20),
    ) {
        for &position in &bad_positions {
            batch[position].url = String::new();
        }

        let mut store = HistoryStore::new();
        store.replace_all(good.clone()).unwrap();

        prop_assert!(store.replace_all(batch).is_err());
        prop_assert_eq!(store.entry_count(), good.len());
    }

    /// Patching the same title twice equals patching it once.
    #[test]
    fn patch_is_idempotent(
        records in proptest::collection::vec(arb_record(), 1..20),
        title in "[a-zA-Z0-9 ]{1,20}",
    ) {
        let mut store = HistoryStore::new();
        store.replace_all(records.clone()).unwrap();
        let target = (records.len() - 1).to_string();

        store.patch_field(&target, "title", &title).unwrap();
        let once = store.get_all();
        store.patch_field(&target, "title", &title).unwrap();
        let twice = store.get_all();

        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(&a.title, &b.title);
            prop_assert_eq!(&a.url, &b.url);
        }
    }
}
