//! Response parser
//!
//! Unwraps the GraphQL envelope of one response page and yields each leaf
//! record once. Root collections live at `data.<collection>`; streams
//! scoped to a parent live one level deeper, at
//! `data.<collection>[].<nested>[]`.
//!
//! A missing envelope key is schema drift or an API error that slipped
//! past the transport, and fails with [`Error::MalformedResponse`].

mod records;

pub use records::RecordIter;

use crate::error::{Error, Result};
use crate::streams::EntityType;
use crate::types::JsonValue;
use serde_json::Value;

/// Where the records of a stream live in a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    /// Collection under `data`
    pub collection: &'static str,
    /// Collection nested inside each element of `collection`, if any
    pub nested: Option<&'static str>,
}

impl Envelope {
    /// Envelope for a stream
    pub fn for_stream(entity: EntityType) -> Self {
        let (collection, nested) = match entity {
            EntityType::Board => ("boards", None),
            EntityType::Group => ("boards", Some("groups")),
            EntityType::Item => ("boards", Some("items")),
            EntityType::Column => ("boards", Some("columns")),
            EntityType::ColumnValue => ("items", Some("column_values")),
        };
        Self { collection, nested }
    }

    /// Dotted path to the records, for messages
    pub fn path(&self) -> String {
        match self.nested {
            Some(nested) => format!("data.{}[].{nested}[]", self.collection),
            None => format!("data.{}[]", self.collection),
        }
    }
}

/// Fail on a non-empty GraphQL `errors` array
pub fn check_errors(body: &Value) -> Result<()> {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return Ok(());
    };
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map_or_else(|| e.to_string(), ToString::to_string)
        })
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::graphql(message))
}

/// Parse one response page of `entity` into a one-pass record sequence
pub fn parse_response(entity: EntityType, body: JsonValue) -> Result<RecordIter> {
    check_errors(&body)?;
    let envelope = Envelope::for_stream(entity);
    let collection = take_collection(entity, &envelope, body)?;
    Ok(RecordIter::new(entity, envelope, collection))
}

/// Count the records of `entity` in a response without consuming it
pub fn count_records(entity: EntityType, body: &JsonValue) -> Result<usize> {
    check_errors(body)?;
    let envelope = Envelope::for_stream(entity);
    let collection = collection_ref(entity, &envelope, body)?;

    let Some(nested) = envelope.nested else {
        return Ok(collection.len());
    };

    collection.iter().enumerate().try_fold(0, |total, (i, parent)| {
        parent
            .get(nested)
            .and_then(Value::as_array)
            .map(|children| total + children.len())
            .ok_or_else(|| {
                Error::malformed(
                    entity.name(),
                    format!("'data.{}[{i}].{nested}' is missing or not an array", envelope.collection),
                )
            })
    })
}

fn collection_ref<'a>(
    entity: EntityType,
    envelope: &Envelope,
    body: &'a Value,
) -> Result<&'a Vec<Value>> {
    let data = body
        .get("data")
        .ok_or_else(|| Error::malformed(entity.name(), "response has no 'data'"))?;
    data.get(envelope.collection)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::malformed(
                entity.name(),
                format!("'data.{}' is missing or not an array", envelope.collection),
            )
        })
}

fn take_collection(entity: EntityType, envelope: &Envelope, mut body: Value) -> Result<Vec<Value>> {
    collection_ref(entity, envelope, &body)?;
    match body["data"][envelope.collection].take() {
        Value::Array(records) => Ok(records),
        _ => Err(Error::malformed(entity.name(), "collection vanished")),
    }
}
