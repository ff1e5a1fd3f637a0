//! Query builder
//!
//! Produces the GraphQL document and variable bindings for one request of
//! one stream. Parent-scoped streams always filter by the single id in
//! their context; the configured board allow-list only applies to the root.

mod templates;

use crate::config::TapConfig;
use crate::error::Result;
use crate::pagination::PageToken;
use crate::streams::{EntityType, StreamContext};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use serde_json::json;

/// A GraphQL request body: `{"query": ..., "variables": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    /// Single-line query document
    pub query: String,
    /// Variable bindings
    pub variables: JsonObject,
}

impl GraphQlRequest {
    /// Create a request from a template, compacting it
    pub fn new(template: &str) -> Self {
        Self {
            query: compact(template),
            variables: JsonObject::new(),
        }
    }

    /// Bind a variable
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Request body as JSON
    pub fn to_json(&self) -> JsonValue {
        json!({ "query": self.query, "variables": self.variables })
    }
}

/// Build the request for one page of `entity` in `context`
///
/// `page` is ignored by streams that do not paginate; paginated streams
/// default to the first page.
pub fn build_query(
    entity: EntityType,
    context: &StreamContext,
    page: Option<PageToken>,
    config: &TapConfig,
) -> Result<GraphQlRequest> {
    let page = page.unwrap_or(PageToken::FIRST).number();

    let request = match entity {
        EntityType::Board => match config.board_ids()? {
            Some(ids) => {
                let limit = ids.len().max(config.board_limit as usize);
                GraphQlRequest::new(&with_board_fields(templates::BOARDS_BY_ID))
                    .variable("ids", ids)
                    .variable("limit", limit)
            }
            None => GraphQlRequest::new(&with_board_fields(templates::BOARDS_PAGE))
                .variable("limit", config.board_limit)
                .variable("page", page),
        },
        EntityType::Group => GraphQlRequest::new(templates::GROUPS)
            .variable("ids", vec![context.require_board(entity)?]),
        EntityType::Item => GraphQlRequest::new(templates::ITEMS)
            .variable("ids", vec![context.require_board(entity)?])
            .variable("limit", config.item_limit)
            .variable("page", page),
        EntityType::Column => GraphQlRequest::new(templates::COLUMNS)
            .variable("ids", vec![context.require_board(entity)?]),
        EntityType::ColumnValue => GraphQlRequest::new(templates::COLUMN_VALUES)
            .variable("ids", vec![context.require_item(entity)?]),
    };

    Ok(request)
}

/// Account probe used by the connection check
pub fn me_query() -> GraphQlRequest {
    GraphQlRequest::new(templates::ME)
}

fn with_board_fields(template: &str) -> String {
    template.replace("{fields}", templates::BOARD_FIELDS)
}

/// Collapse all whitespace runs to single spaces
pub fn compact(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
