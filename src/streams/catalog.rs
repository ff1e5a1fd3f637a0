//! Static stream definitions
//!
//! One entry per entity kind. The field lists are the complete shape of a
//! normalized row. Ids, parent keys, flattened columns and `tapped_at` are
//! always present; descriptive fields pass through as null when the API
//! omits them.

use super::types::{EntityType, FieldDef, StreamDef};
use crate::types::FieldType::{Boolean, DateTime, Integer, Number, String as Text};

/// Extraction timestamp attached to every row
pub const TAPPED_AT: &str = "tapped_at";

static BOARDS: StreamDef = StreamDef {
    entity: EntityType::Board,
    name: "boards",
    primary_keys: &["id"],
    replication_key: Some("updated_at"),
    parent: None,
    children: &[EntityType::Group, EntityType::Item, EntityType::Column],
    fields: &[
        FieldDef::required("id", Integer),
        FieldDef::required("board_id", Integer),
        FieldDef::nullable("name", Text),
        FieldDef::nullable("description", Text),
        FieldDef::nullable("state", Text),
        FieldDef::nullable("updated_at", DateTime),
        FieldDef::required("workspace_id", Integer),
        FieldDef::required("workspace_name", Text),
        FieldDef::required("owner_id", Integer),
        FieldDef::required("owner_name", Text),
        FieldDef::required("owner_email", Text),
        FieldDef::required(TAPPED_AT, DateTime),
    ],
};

static GROUPS: StreamDef = StreamDef {
    entity: EntityType::Group,
    name: "groups",
    primary_keys: &["id", "board_id"],
    replication_key: None,
    parent: Some(EntityType::Board),
    children: &[],
    fields: &[
        FieldDef::required("id", Text),
        FieldDef::required("board_id", Integer),
        FieldDef::required("group_id", Text),
        FieldDef::nullable("title", Text),
        FieldDef::nullable("position", Number),
        FieldDef::nullable("color", Text),
        FieldDef::nullable("archived", Boolean),
        FieldDef::nullable("deleted", Boolean),
        FieldDef::required(TAPPED_AT, DateTime),
    ],
};

static ITEMS: StreamDef = StreamDef {
    entity: EntityType::Item,
    name: "items",
    primary_keys: &["id"],
    replication_key: Some("updated_at"),
    parent: Some(EntityType::Board),
    children: &[EntityType::ColumnValue],
    fields: &[
        FieldDef::required("id", Integer),
        FieldDef::nullable("name", Text),
        FieldDef::nullable("state", Text),
        FieldDef::nullable("created_at", DateTime),
        FieldDef::nullable("updated_at", DateTime),
        FieldDef::required("creator_id", Integer),
        FieldDef::required("creator_email", Text),
        FieldDef::required("creator_name", Text),
        FieldDef::required("group_id", Text),
        FieldDef::required("group_title", Text),
        FieldDef::required("parent_item_id", Integer),
        FieldDef::required("board_id", Integer),
        FieldDef::required("board_name", Text),
        FieldDef::required(TAPPED_AT, DateTime),
    ],
};

static COLUMNS: StreamDef = StreamDef {
    entity: EntityType::Column,
    name: "columns",
    primary_keys: &["id", "board_id"],
    replication_key: None,
    parent: Some(EntityType::Board),
    children: &[],
    fields: &[
        FieldDef::required("id", Text),
        FieldDef::required("board_id", Integer),
        FieldDef::nullable("title", Text),
        FieldDef::nullable("archived", Boolean),
        FieldDef::nullable("settings_str", Text),
        FieldDef::nullable("description", Text),
        FieldDef::nullable("type", Text),
        FieldDef::nullable("width", Integer),
        FieldDef::required(TAPPED_AT, DateTime),
    ],
};

static COLUMN_VALUES: StreamDef = StreamDef {
    entity: EntityType::ColumnValue,
    name: "column_values",
    primary_keys: &["id", "item_id"],
    replication_key: None,
    parent: Some(EntityType::Item),
    children: &[],
    fields: &[
        FieldDef::required("id", Text),
        FieldDef::required("item_id", Integer),
        FieldDef::nullable("title", Text),
        FieldDef::nullable("type", Text),
        FieldDef::nullable("text", Text),
        FieldDef::required("value", Text),
        FieldDef::required("additional_info", Text),
        FieldDef::required(TAPPED_AT, DateTime),
    ],
};

pub(super) fn definition(entity: EntityType) -> &'static StreamDef {
    match entity {
        EntityType::Board => &BOARDS,
        EntityType::Group => &GROUPS,
        EntityType::Item => &ITEMS,
        EntityType::Column => &COLUMNS,
        EntityType::ColumnValue => &COLUMN_VALUES,
    }
}
