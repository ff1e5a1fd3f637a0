//! Row normalizer
//!
//! Turns one raw record into the row that is emitted. Pure apart from
//! reading the clock for `tapped_at`; [`normalize_at`] takes the timestamp
//! explicitly.
//!
//! Each stream has one shaping function, picked by entity kind. The steps
//! it applies are:
//!
//! 1. flatten nested objects into `<object>_<field>` columns, with zero or
//!    empty fallbacks when the object is null
//! 2. coerce numeric ids that arrive as strings
//! 3. inject parent foreign keys from the fetch context
//! 4. serialize opaque JSON fields to text
//! 5. stamp `tapped_at`
//!
//! and finally the row is projected onto the stream's declared fields.

mod row;

use crate::error::Result;
use crate::streams::{EntityType, StreamContext, TAPPED_AT};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, SecondsFormat, Utc};
use row::{Fallback, Flatten, Row};
use serde_json::Value;
use tracing::trace;

type Shaper = fn(&mut Row, &StreamContext) -> Result<()>;

const WORKSPACE: &[Flatten] = &[
    Flatten::new("id", "workspace_id", Fallback::Zero),
    Flatten::new("name", "workspace_name", Fallback::Empty),
];

const OWNER: &[Flatten] = &[
    Flatten::new("id", "owner_id", Fallback::Zero),
    Flatten::new("name", "owner_name", Fallback::Empty),
    Flatten::new("email", "owner_email", Fallback::Empty),
];

const CREATOR: &[Flatten] = &[
    Flatten::new("email", "creator_email", Fallback::Empty),
    Flatten::new("name", "creator_name", Fallback::Empty),
];

const PARENT_ITEM: &[Flatten] = &[Flatten::new("id", "parent_item_id", Fallback::Zero)];

const ITEM_BOARD: &[Flatten] = &[
    Flatten::new("id", "board_id", Fallback::Absent),
    Flatten::new("name", "board_name", Fallback::Empty),
];

const ITEM_GROUP: &[Flatten] = &[
    Flatten::new("id", "group_id", Fallback::Empty),
    Flatten::new("title", "group_title", Fallback::Empty),
];

fn shaper(entity: EntityType) -> Shaper {
    match entity {
        EntityType::Board => shape_board,
        EntityType::Group => shape_group,
        EntityType::Item => shape_item,
        EntityType::Column => shape_column,
        EntityType::ColumnValue => shape_column_value,
    }
}

fn shape_board(row: &mut Row, _context: &StreamContext) -> Result<()> {
    row.flatten("workspace", WORKSPACE)?;
    row.flatten("owner", OWNER)?;
    row.coerce_int("id", None)?;
    row.derive("board_id", "id");
    row.coerce_int("workspace_id", Some(0))?;
    row.coerce_int("owner_id", Some(0))
}

fn shape_group(row: &mut Row, context: &StreamContext) -> Result<()> {
    row.coerce_float("position")?;
    row.inject_parent("board_id", context.board_id())?;
    row.derive("group_id", "id");
    Ok(())
}

fn shape_item(row: &mut Row, context: &StreamContext) -> Result<()> {
    row.flatten("creator", CREATOR)?;
    row.flatten("parent_item", PARENT_ITEM)?;
    row.flatten("board", ITEM_BOARD)?;
    row.flatten("group", ITEM_GROUP)?;
    row.coerce_int("id", None)?;
    row.coerce_int("creator_id", Some(0))?;
    row.coerce_int("parent_item_id", Some(0))?;
    row.inject_parent("board_id", context.board_id())
}

fn shape_column(row: &mut Row, context: &StreamContext) -> Result<()> {
    row.coerce_int("width", None)?;
    row.inject_parent("board_id", context.board_id())
}

fn shape_column_value(row: &mut Row, context: &StreamContext) -> Result<()> {
    row.inject_parent("item_id", context.item_id())?;
    row.serialize_json("value")?;
    row.serialize_json("additional_info")
}

/// Normalize a raw record, stamping it with the current time
pub fn normalize(
    entity: EntityType,
    raw: JsonObject,
    context: &StreamContext,
) -> Result<JsonObject> {
    normalize_at(entity, raw, context, Utc::now())
}

/// Normalize a raw record, stamping it with `tapped_at`
pub fn normalize_at(
    entity: EntityType,
    raw: JsonObject,
    context: &StreamContext,
    tapped_at: DateTime<Utc>,
) -> Result<JsonObject> {
    let mut row = Row::new(entity, raw);
    shaper(entity)(&mut row, context)?;
    row.set(TAPPED_AT, format_timestamp(tapped_at));

    let shaped = row.project(entity.def())?;
    trace!(stream = entity.name(), %context, "normalized record");
    Ok(shaped)
}

/// ISO 8601 UTC with second precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Read an integer from a number or a numeric string
pub fn value_as_i64(value: &JsonValue) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
