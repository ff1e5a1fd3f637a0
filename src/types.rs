//! Common types used throughout the tap
//!
//! Shared type aliases and small enums used by the stream graph,
//! the normalizer and the output protocol.

use serde::{Deserialize, Serialize};
use serde_json::json;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type; raw and normalized rows are both carried as this
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Sync Mode
// ============================================================================

/// Synchronization mode for streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Full refresh - fetch all data every time
    #[default]
    FullRefresh,
    /// Incremental - track a replication key between runs
    Incremental,
}

// ============================================================================
// Field Types
// ============================================================================

/// Type of a declared output field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 64-bit signed integer
    Integer,
    /// Floating point number
    Number,
    /// Free-form string
    String,
    /// Boolean flag
    Boolean,
    /// ISO 8601 timestamp string
    DateTime,
}

impl FieldType {
    /// JSON Schema fragment for this type
    pub fn json_schema(self, nullable: bool) -> JsonValue {
        let base = match self {
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String | FieldType::DateTime => "string",
            FieldType::Boolean => "boolean",
        };
        let types = if nullable {
            json!([base, "null"])
        } else {
            json!([base])
        };

        if self == FieldType::DateTime {
            json!({ "type": types, "format": "date-time" })
        } else {
            json!({ "type": types })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_serde() {
        let mode: SyncMode = serde_json::from_str("\"incremental\"").unwrap();
        assert_eq!(mode, SyncMode::Incremental);

        let json = serde_json::to_string(&SyncMode::FullRefresh).unwrap();
        assert_eq!(json, "\"full_refresh\"");
    }

    #[test]
    fn test_field_type_schema() {
        assert_eq!(
            FieldType::Integer.json_schema(false),
            json!({ "type": ["integer"] })
        );
        assert_eq!(
            FieldType::String.json_schema(true),
            json!({ "type": ["string", "null"] })
        );
        assert_eq!(
            FieldType::DateTime.json_schema(false),
            json!({ "type": ["string"], "format": "date-time" })
        );
    }
}
