//! Tests for the stream graph

use super::*;
use crate::types::SyncMode;
use serde_json::json;

fn object(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Definition Tests
// ============================================================================

#[test]
fn test_stream_names() {
    let names: Vec<&str> = EntityType::ALL.iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec!["boards", "groups", "items", "column_values", "columns"]
    );
}

#[test]
fn test_from_str() {
    assert_eq!("items".parse::<EntityType>().unwrap(), EntityType::Item);
    assert_eq!(
        " column_values ".parse::<EntityType>().unwrap(),
        EntityType::ColumnValue
    );
    assert!(matches!(
        "workspaces".parse::<EntityType>(),
        Err(Error::StreamNotFound { .. })
    ));
}

#[test]
fn test_keys_and_replication() {
    assert_eq!(EntityType::Board.def().primary_keys, &["id"]);
    assert_eq!(EntityType::Board.def().replication_key, Some("updated_at"));
    assert_eq!(EntityType::Board.def().sync_mode(), SyncMode::Incremental);

    assert_eq!(EntityType::Group.def().primary_keys, &["id", "board_id"]);
    assert_eq!(EntityType::Group.def().replication_key, None);
    assert_eq!(EntityType::Group.def().sync_mode(), SyncMode::FullRefresh);

    assert_eq!(EntityType::Item.def().replication_key, Some("updated_at"));
    assert_eq!(EntityType::Column.def().primary_keys, &["id", "board_id"]);
    assert_eq!(EntityType::ColumnValue.def().primary_keys, &["id", "item_id"]);
}

#[test]
fn test_primary_and_replication_keys_are_declared_fields() {
    let declares = |def: &StreamDef, name: &str| def.fields.iter().any(|f| f.name == name);

    for entity in EntityType::ALL {
        let def = entity.def();
        for key in def.primary_keys {
            assert!(declares(def, key), "{entity}: key {key} not declared");
        }
        if let Some(key) = def.replication_key {
            assert!(declares(def, key), "{entity}: {key} not declared");
        }
        assert!(declares(def, TAPPED_AT));
    }
}

#[test]
fn test_graph_edges() {
    assert!(EntityType::Board.is_root());
    assert_eq!(
        children_of(EntityType::Board),
        &[EntityType::Group, EntityType::Item, EntityType::Column]
    );
    assert_eq!(children_of(EntityType::Item), &[EntityType::ColumnValue]);
    assert!(children_of(EntityType::Group).is_empty());
    assert!(children_of(EntityType::Column).is_empty());
    assert!(children_of(EntityType::ColumnValue).is_empty());

    for entity in EntityType::ALL {
        for child in children_of(entity) {
            assert_eq!(child.parent(), Some(entity));
        }
    }
}

#[test]
fn test_lineage() {
    assert_eq!(
        EntityType::ColumnValue.lineage(),
        vec![EntityType::Board, EntityType::Item, EntityType::ColumnValue]
    );
    assert_eq!(EntityType::Board.lineage(), vec![EntityType::Board]);
}

#[test]
fn test_json_schema() {
    let schema = EntityType::Board.def().json_schema();
    assert_eq!(schema["properties"]["id"]["type"], json!(["integer"]));
    assert_eq!(
        schema["properties"]["description"]["type"],
        json!(["string", "null"])
    );
    assert_eq!(schema["properties"]["updated_at"]["format"], "date-time");
    let required = schema["required"].as_array().unwrap();
    assert!(required.contains(&json!("owner_email")));
    assert!(!required.contains(&json!("description")));
}

// ============================================================================
// Context Tests
// ============================================================================

#[test]
fn test_context_from_board() {
    let board = object(json!({"id": 2389168662_i64, "name": "My board"}));
    let context = context_for_child(EntityType::Board, &StreamContext::root(), &board).unwrap();

    assert_eq!(context.board_id(), Some(2389168662));
    assert_eq!(context.item_id(), None);
}

#[test]
fn test_context_from_item_keeps_board() {
    let parent = StreamContext::root().with_board(2389168662);
    let item = object(json!({"id": 2274512428_i64, "board_id": 999}));
    let context = context_for_child(EntityType::Item, &parent, &item).unwrap();

    assert_eq!(context.board_id(), Some(2389168662));
    assert_eq!(context.item_id(), Some(2274512428));
}

#[test]
fn test_context_from_item_without_board_context() {
    let item = object(json!({"id": "2274512428", "board_id": 2389168662_i64}));
    let context = context_for_child(EntityType::Item, &StreamContext::root(), &item).unwrap();

    assert_eq!(context.board_id(), Some(2389168662));
    assert_eq!(context.item_id(), Some(2274512428));
}

#[test]
fn test_context_requires_parent_id() {
    let board = object(json!({"name": "no id"}));
    let err = context_for_child(EntityType::Board, &StreamContext::root(), &board).unwrap_err();
    assert!(matches!(err, Error::Normalization { ref field, .. } if field == "id"));
}

#[test]
fn test_context_from_leaf_is_error() {
    let group = object(json!({"id": 1}));
    assert!(context_for_child(EntityType::Group, &StreamContext::root(), &group).is_err());
}

#[test]
fn test_context_display() {
    assert_eq!(StreamContext::root().to_string(), "root");
    assert_eq!(StreamContext::root().with_board(7).to_string(), "board 7");
    assert_eq!(
        StreamContext::root().with_board(7).with_item(9).to_string(),
        "board 7 / item 9"
    );
}

// ============================================================================
// Selection Tests
// ============================================================================

#[test]
fn test_selection_all() {
    let selection = StreamSelection::parse("").unwrap();
    assert_eq!(selection, StreamSelection::all());
    for entity in EntityType::ALL {
        assert!(selection.is_selected(entity));
        assert!(selection.needs_fetch(entity));
    }
}

#[test]
fn test_selection_child_fetches_ancestors() {
    let selection = StreamSelection::parse("column_values").unwrap();

    assert!(selection.is_selected(EntityType::ColumnValue));
    assert!(!selection.is_selected(EntityType::Board));
    assert!(!selection.is_selected(EntityType::Item));

    assert!(selection.needs_fetch(EntityType::Board));
    assert!(selection.needs_fetch(EntityType::Item));
    assert!(!selection.needs_fetch(EntityType::Group));
    assert!(!selection.needs_fetch(EntityType::Column));
}

#[test]
fn test_selection_unknown_stream() {
    assert!(StreamSelection::parse("boards,tags").is_err());
}
