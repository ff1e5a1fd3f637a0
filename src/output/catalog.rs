//! Stream catalog for discovery

use crate::streams::{EntityType, StreamDef};
use crate::types::{JsonValue, SyncMode};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Every stream the tap can extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per stream, in traversal order
    pub streams: Vec<CatalogEntry>,
}

/// Description of one stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream identifier
    pub tap_stream_id: String,
    /// Stream name
    pub stream: String,
    /// JSON Schema of a record
    pub schema: JsonValue,
    /// Primary key fields
    pub key_properties: Vec<String>,
    /// Replication key, if incremental
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    /// Sync mode implied by the replication key
    pub replication_method: SyncMode,
    /// Parent stream, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stream: Option<String>,
    /// Singer metadata
    pub metadata: Vec<JsonValue>,
}

impl Catalog {
    /// Catalog of all streams
    pub fn discover() -> Self {
        Self {
            streams: EntityType::ALL
                .into_iter()
                .map(|entity| CatalogEntry::from_def(entity.def()))
                .collect(),
        }
    }
}

impl CatalogEntry {
    /// Build the entry for one stream
    pub fn from_def(def: &StreamDef) -> Self {
        let key_properties: Vec<String> =
            def.primary_keys.iter().map(ToString::to_string).collect();
        let replication_key = def.replication_key.map(ToString::to_string);

        let mut metadata = vec![json!({
            "breadcrumb": [],
            "metadata": {
                "inclusion": "available",
                "selected": true,
                "table-key-properties": key_properties,
                "valid-replication-keys": replication_key.iter().collect::<Vec<_>>(),
                "forced-replication-method": def.sync_mode(),
            }
        })];
        metadata.extend(def.fields.iter().map(|field| {
            let automatic = def.primary_keys.contains(&field.name)
                || def.replication_key == Some(field.name);
            json!({
                "breadcrumb": ["properties", field.name],
                "metadata": {
                    "inclusion": if automatic { "automatic" } else { "available" },
                }
            })
        }));

        Self {
            tap_stream_id: def.name.to_string(),
            stream: def.name.to_string(),
            schema: def.json_schema(),
            key_properties,
            replication_key,
            replication_method: def.sync_mode(),
            parent_stream: def.parent.map(|p| p.name().to_string()),
            metadata,
        }
    }
}
