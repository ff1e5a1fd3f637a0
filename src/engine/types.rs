//! Engine types
//!
//! Output messages and run statistics for the sync engine.

use crate::streams::{EntityType, StreamDef, StreamSelection};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message emitted during sync, in the Singer wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Shape of a stream's records; precedes its first record
    Schema {
        /// Stream name
        stream: String,
        /// JSON Schema of a record
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key, if the stream is incremental
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One normalized record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: JsonObject,
        /// When the record was extracted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<String>,
    },
    /// Bookmark state to resume from
    State {
        /// Complete state document
        value: JsonValue,
    },
}

impl Message {
    /// Create the schema message of a stream
    pub fn schema(def: &StreamDef) -> Self {
        Self::Schema {
            stream: def.name.to_string(),
            schema: def.json_schema(),
            key_properties: def.primary_keys.iter().map(ToString::to_string).collect(),
            bookmark_properties: def.replication_key.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: JsonObject) -> Self {
        let time_extracted = record
            .get(crate::streams::TAPPED_AT)
            .and_then(JsonValue::as_str)
            .map(ToString::to_string);
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted,
        }
    }

    /// Create a state message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }

    /// Stream the message belongs to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Streams whose records are emitted
    pub selection: StreamSelection,
    /// Ignore stored bookmarks and emit every record
    pub ignore_bookmarks: bool,
}

impl SyncConfig {
    /// Create a new sync config selecting every stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stream selection
    #[must_use]
    pub fn with_selection(mut self, selection: StreamSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Ignore stored bookmarks
    #[must_use]
    pub fn with_ignore_bookmarks(mut self, ignore: bool) -> Self {
        self.ignore_bookmarks = ignore;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStats {
    /// Records emitted, per stream
    pub records: BTreeMap<String, usize>,
    /// Records older than the stored bookmark, not emitted
    pub records_skipped: usize,
    /// Requests sent
    pub requests: usize,
    /// Parent contexts a child stream was fetched in
    pub contexts: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an emitted record
    pub fn add_record(&mut self, entity: EntityType) {
        *self.records.entry(entity.name().to_string()).or_default() += 1;
    }

    /// Count a record filtered out by its bookmark
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Count a request
    pub fn add_request(&mut self) {
        self.requests += 1;
    }

    /// Count a child fetch context
    pub fn add_context(&mut self) {
        self.contexts += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Records emitted for one stream
    pub fn records_for(&self, entity: EntityType) -> usize {
        self.records.get(entity.name()).copied().unwrap_or(0)
    }

    /// Records emitted across all streams
    pub fn records_synced(&self) -> usize {
        self.records.values().sum()
    }
}
