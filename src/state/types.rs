//! Bookmark types for incremental extraction
//!
//! Serialized in the Singer layout so the state emitted by one run can be
//! fed straight into the next:
//!
//! ```json
//! {"bookmarks": {"items": {"replication_key": "updated_at",
//!                          "replication_key_value": "2024-02-01T00:00:00Z"}}}
//! ```

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete bookmark state for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bookmark for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&Bookmark> {
        self.bookmarks.get(stream)
    }

    /// Get the high-watermark value for a stream
    pub fn bookmark_value(&self, stream: &str) -> Option<&str> {
        self.bookmarks
            .get(stream)
            .map(|b| b.replication_key_value.as_str())
    }

    /// Move a stream's bookmark to `value` if that is later than the current
    /// one. Returns whether the bookmark changed.
    pub fn advance(&mut self, stream: &str, replication_key: &str, value: &str) -> bool {
        if let Some(current) = self.bookmarks.get(stream) {
            if compare_replication_values(value, &current.replication_key_value)
                != Ordering::Greater
            {
                return false;
            }
        }

        self.bookmarks.insert(
            stream.to_string(),
            Bookmark::new(replication_key, value),
        );
        true
    }
}

/// High-watermark for one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Field the watermark is taken from
    pub replication_key: String,
    /// Largest value of that field seen in a completed run
    pub replication_key_value: String,
}

impl Bookmark {
    /// Create a bookmark
    pub fn new(replication_key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            replication_key: replication_key.into(),
            replication_key_value: value.into(),
        }
    }
}

/// Order two replication-key values
///
/// Both are compared as instants when both parse as RFC 3339, so offsets
/// are honored; otherwise they are compared as strings.
pub fn compare_replication_values(a: &str, b: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
