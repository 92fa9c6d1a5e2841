use serde::{Deserialize, Serialize};

/// A single bookmark held by the bookmark sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub created_at: i64,
}
