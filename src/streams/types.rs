//! Stream graph types
//!
//! Entity kinds, their static definitions and the immutable context value
//! passed from a parent stream into its children.

use crate::error::{Error, Result};
use crate::types::{FieldType, JsonObject, JsonValue, SyncMode};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// The closed set of entity kinds extracted by the tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Board,
    Group,
    Item,
    Column,
    ColumnValue,
}

impl EntityType {
    /// Every entity kind, in traversal order
    pub const ALL: [EntityType; 5] = [
        EntityType::Board,
        EntityType::Group,
        EntityType::Item,
        EntityType::ColumnValue,
        EntityType::Column,
    ];

    /// Stream name used in output messages and state
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Static definition for this entity kind
    pub fn def(self) -> &'static StreamDef {
        super::catalog::definition(self)
    }

    /// Parent entity kind, if any
    pub fn parent(self) -> Option<EntityType> {
        self.def().parent
    }

    /// Whether this is the root of the graph
    pub fn is_root(self) -> bool {
        self.parent().is_none()
    }

    /// This entity and all of its ancestors, root first
    pub fn lineage(self) -> Vec<EntityType> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.name() == s.trim())
            .ok_or_else(|| Error::StreamNotFound {
                stream: s.to_string(),
            })
    }
}

/// A declared output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name in the emitted row
    pub name: &'static str,
    /// Value type
    pub field_type: FieldType,
    /// Whether `null` is an acceptable value
    pub nullable: bool,
}

impl FieldDef {
    /// A field that must always be present
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: false,
        }
    }

    /// A field that may be null
    pub const fn nullable(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: true,
        }
    }
}

/// Static definition of one stream
#[derive(Debug)]
pub struct StreamDef {
    /// Entity kind
    pub entity: EntityType,
    /// Stream name
    pub name: &'static str,
    /// Primary key fields
    pub primary_keys: &'static [&'static str],
    /// Replication key; `None` means full refresh per parent
    pub replication_key: Option<&'static str>,
    /// Parent stream
    pub parent: Option<EntityType>,
    /// Child streams, fetched per parent record in this order
    pub children: &'static [EntityType],
    /// Output fields of a normalized row
    pub fields: &'static [FieldDef],
}

impl StreamDef {
    /// Sync mode implied by the replication key
    pub fn sync_mode(&self) -> SyncMode {
        if self.replication_key.is_some() {
            SyncMode::Incremental
        } else {
            SyncMode::FullRefresh
        }
    }

    /// JSON Schema describing a normalized row
    pub fn json_schema(&self) -> JsonValue {
        let properties: JsonObject = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.field_type.json_schema(f.nullable)))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| !f.nullable)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Parent identifiers handed from a parent stream to its children
///
/// Built only by [`super::context_for_child`]; a child never discovers its
/// parent on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    board_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_id: Option<i64>,
}

impl StreamContext {
    /// Context of the root stream
    pub fn root() -> Self {
        Self::default()
    }

    /// Context scoped to a board
    #[must_use]
    pub fn with_board(mut self, board_id: i64) -> Self {
        self.board_id = Some(board_id);
        self
    }

    /// Context scoped to an item
    #[must_use]
    pub fn with_item(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }

    /// Board in scope, if any
    pub fn board_id(&self) -> Option<i64> {
        self.board_id
    }

    /// Item in scope, if any
    pub fn item_id(&self) -> Option<i64> {
        self.item_id
    }

    /// Board in scope, or an error naming the stream that needed it
    pub fn require_board(&self, entity: EntityType) -> Result<i64> {
        self.board_id
            .ok_or_else(|| Error::config(format!("stream '{entity}' requires a board context")))
    }

    /// Item in scope, or an error naming the stream that needed it
    pub fn require_item(&self, entity: EntityType) -> Result<i64> {
        self.item_id
            .ok_or_else(|| Error::config(format!("stream '{entity}' requires an item context")))
    }

    /// Whether no parent identifiers are set
    pub fn is_root(&self) -> bool {
        self.board_id.is_none() && self.item_id.is_none()
    }
}

impl fmt::Display for StreamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.board_id, self.item_id) {
            (None, None) => f.write_str("root"),
            (Some(board), None) => write!(f, "board {board}"),
            (None, Some(item)) => write!(f, "item {item}"),
            (Some(board), Some(item)) => write!(f, "board {board} / item {item}"),
        }
    }
}
