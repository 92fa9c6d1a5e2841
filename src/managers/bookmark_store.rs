//! Bookmark sink for Tabitha.
//!
//! The recommendations surface creates bookmarks and probes for existing
//! ones through the `BookmarkSink` contract; this is the in-memory
//! implementation backing the RPC methods.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

/// Side-effect collaborator contract for bookmark creation.
pub trait BookmarkSink {
    /// Creates a bookmark and returns its id. A URL that is already
    /// bookmarked is rejected rather than duplicated.
    fn create(&mut self, title: &str, url: &str) -> Result<String, BookmarkError>;
    fn exists(&self, url: &str) -> bool;
}

/// In-memory bookmark store.
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self {
            bookmarks: Vec::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// All bookmarks in creation order.
    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }
}

impl Default for BookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkSink for BookmarkStore {
    fn create(&mut self, title: &str, url: &str) -> Result<String, BookmarkError> {
        if url.is_empty() {
            return Err(BookmarkError::InvalidUrl(url.to_string()));
        }
        if self.exists(url) {
            return Err(BookmarkError::DuplicateUrl(url.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        self.bookmarks.push(Bookmark {
            id: id.clone(),
            url: url.to_string(),
            title: title.to_string(),
            created_at: Self::now(),
        });
        Ok(id)
    }

    fn exists(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|bookmark| bookmark.url == url)
    }
}
