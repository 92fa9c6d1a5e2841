//! RPC method handler for the Tabitha JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! stores and engines via the `App` struct.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::BookmarkSink;
use crate::managers::history_store::HistoryStoreTrait;
use crate::services::insights_engine::InsightsEngineTrait;
use crate::services::merge_engine::{merge_terms, TimeRange};
use crate::services::store_lookup::StoreLookup;
use crate::services::time_bucketer::bucket_visits;
use crate::types::history::{IngestRecord, RawVisit};

const DEFAULT_MAX_RESULTS: usize = 100;

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Every mutation runs to completion under the app lock, so requests never
/// observe interleaved partial writes.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── History store ───
        "history.ingest" => {
            let records_val = params.get("records").cloned().ok_or("missing records")?;
            let records: Vec<IngestRecord> = serde_json::from_value(records_val)
                .map_err(|e| format!("invalid records payload: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let count = a
                .history_store
                .replace_all(records)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "count": count}))
        }
        "history.all" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let entries = a.history_store.get_all();
            serde_json::to_value(entries).map_err(|e| e.to_string())
        }
        "history.patch" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let (field, value) = match params.get("field").and_then(|v| v.as_str()) {
                Some(field) => {
                    let value = params
                        .get("value")
                        .and_then(|v| v.as_str())
                        .ok_or("missing value")?;
                    (field, value)
                }
                // Observed usage: the table edits the title.
                None => {
                    let title = params
                        .get("title")
                        .and_then(|v| v.as_str())
                        .ok_or("missing title")?;
                    ("title", title)
                }
            };
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.history_store
                .patch_field(id, field, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Merged term search ───
        "history.search" => {
            let terms_val = params.get("terms").cloned().ok_or("missing terms")?;
            let terms: Vec<String> = serde_json::from_value(terms_val)
                .map_err(|e| format!("invalid terms payload: {}", e))?;
            let start = params
                .get("start_time")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            let end = params
                .get("end_time")
                .and_then(|v| v.as_i64())
                .unwrap_or_else(now_ms);
            let max_results = params
                .get("max_results")
                .and_then(|v| v.as_u64())
                .unwrap_or(DEFAULT_MAX_RESULTS as u64) as usize;

            let a = app.lock().map_err(|e| e.to_string())?;
            let lookup = StoreLookup::from_entries(&a.history_store.get_all());
            let outcome = merge_terms(&lookup, &terms, TimeRange::new(start, end), max_results);

            let failed: Vec<Value> = outcome
                .failed_terms
                .iter()
                .map(|(term, err)| json!({"term": term, "error": err.to_string()}))
                .collect();
            Ok(json!({
                "records": outcome.records,
                "partial": !failed.is_empty(),
                "failed_terms": failed,
            }))
        }

        // ─── Grouped view ───
        "history.grouped" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let visits: Vec<RawVisit> = a
                .history_store
                .get_all()
                .iter()
                .map(|entry| entry.as_raw_visit())
                .collect();
            let outcome = bucket_visits(&visits);

            let rejected: Vec<Value> = outcome
                .rejected
                .iter()
                .map(|r| json!({"url": r.visit.url, "error": r.error.to_string()}))
                .collect();
            Ok(json!({
                "groups": outcome.buckets,
                "flattened": outcome.flatten(),
                "rejected": rejected,
            }))
        }

        // ─── Insights ───
        "insights.compute" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let entries = a.history_store.get_all();
            let insights = a.insights_engine.compute(&entries);
            serde_json::to_value(insights).map_err(|e| e.to_string())
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let title = params
                .get("title")
                .and_then(|v| v.as_str())
                .ok_or("missing title")?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("invalid url: must start with http:// or https://".to_string());
            }
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a
                .bookmark_store
                .create(title, url)
                .map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "url": url, "title": title}))
        }
        "bookmark.exists" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"exists": a.bookmark_store.exists(url)}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
