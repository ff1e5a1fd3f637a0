//! Stream graph
//!
//! Declares the entity kinds the tap extracts, their keys, and the
//! parent → child edges that decide fetch order:
//!
//! ```text
//! boards ─┬─ groups
//!         ├─ items ── column_values
//!         └─ columns
//! ```
//!
//! A child stream is fetched once per parent record, with a
//! [`StreamContext`] derived from that record by [`context_for_child`].

mod catalog;
mod types;

pub use catalog::TAPPED_AT;
pub use types::{EntityType, FieldDef, StreamContext, StreamDef};

use crate::error::{Error, Result};
use crate::normalize::value_as_i64;
use crate::types::JsonObject;
use std::collections::BTreeSet;

/// The root of the graph
pub const ROOT: EntityType = EntityType::Board;

/// Child streams of `entity`, in fetch order
pub fn children_of(entity: EntityType) -> &'static [EntityType] {
    entity.def().children
}

/// Derive the context a child of `parent` runs in, from one normalized
/// parent record and the context the parent itself ran in
pub fn context_for_child(
    parent: EntityType,
    parent_context: &StreamContext,
    record: &JsonObject,
) -> Result<StreamContext> {
    let id = record
        .get("id")
        .and_then(value_as_i64)
        .ok_or_else(|| Error::normalization(parent.name(), "id"))?;

    match parent {
        EntityType::Board => Ok(StreamContext::root().with_board(id)),
        EntityType::Item => {
            let mut context = parent_context.with_item(id);
            if context.board_id().is_none() {
                if let Some(board_id) = record.get("board_id").and_then(value_as_i64) {
                    context = context.with_board(board_id);
                }
            }
            Ok(context)
        }
        other => Err(Error::Other(format!("stream '{other}' has no child streams"))),
    }
}

// ============================================================================
// Stream Selection
// ============================================================================

/// The set of streams whose records should be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSelection {
    selected: BTreeSet<EntityType>,
}

impl StreamSelection {
    /// Select every stream
    pub fn all() -> Self {
        Self {
            selected: EntityType::ALL.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list of stream names; empty means all
    pub fn parse(names: &str) -> Result<Self> {
        let selected = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect::<Result<BTreeSet<EntityType>>>()?;

        if selected.is_empty() {
            Ok(Self::all())
        } else {
            Ok(Self { selected })
        }
    }

    /// Whether records of `entity` are emitted
    pub fn is_selected(&self, entity: EntityType) -> bool {
        self.selected.contains(&entity)
    }

    /// Whether `entity` must be fetched: it is selected, or it is an
    /// ancestor of a selected stream
    pub fn needs_fetch(&self, entity: EntityType) -> bool {
        self.selected
            .iter()
            .any(|selected| selected.lineage().contains(&entity))
    }

    /// Selected streams in traversal order
    pub fn streams(&self) -> Vec<EntityType> {
        EntityType::ALL
            .into_iter()
            .filter(|entity| self.is_selected(*entity))
            .collect()
    }
}

impl Default for StreamSelection {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests;
