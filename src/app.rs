//! App Core for Tabitha.
//!
//! Central struct owning the stateful stores and the insights engine.
//! Everything is an owned field rather than module-level state, so tests can
//! run isolated instances concurrently and reset by simply dropping the App.

use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::history_store::HistoryStore;
use crate::services::insights_engine::InsightsEngine;

/// Central application struct.
///
/// The history store starts empty at process start and is reset only by an
/// explicit snapshot replacement; nothing is persisted across restarts.
pub struct App {
    pub history_store: HistoryStore,
    pub bookmark_store: BookmarkStore,
    pub insights_engine: InsightsEngine,
}

impl App {
    pub fn new() -> Self {
        Self {
            history_store: HistoryStore::new(),
            bookmark_store: BookmarkStore::new(),
            insights_engine: InsightsEngine::new(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
