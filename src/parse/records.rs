//! One-pass record iterator over a response page

use super::Envelope;
use crate::error::{Error, Result};
use crate::streams::EntityType;
use crate::types::JsonObject;
use serde_json::Value;
use std::vec::IntoIter;

/// Lazy sequence of raw records from one response page
///
/// Owns the page; each record is yielded once and the sequence cannot be
/// restarted. A malformed element yields an error and ends the sequence.
#[derive(Debug)]
pub struct RecordIter {
    entity: EntityType,
    envelope: Envelope,
    parents: IntoIter<Value>,
    parent_index: usize,
    current: Option<IntoIter<Value>>,
    failed: bool,
}

impl RecordIter {
    pub(super) fn new(entity: EntityType, envelope: Envelope, collection: Vec<Value>) -> Self {
        Self {
            entity,
            envelope,
            parents: collection.into_iter(),
            parent_index: 0,
            current: None,
            failed: false,
        }
    }

    fn fail(&mut self, message: String) -> Option<Result<JsonObject>> {
        self.failed = true;
        Some(Err(Error::malformed(self.entity.name(), message)))
    }

    fn leaf(&mut self, value: Value) -> Option<Result<JsonObject>> {
        match value {
            Value::Object(record) => Some(Ok(record)),
            other => self.fail(format!(
                "expected an object at '{}', found {other}",
                self.envelope.path()
            )),
        }
    }
}

impl Iterator for RecordIter {
    type Item = Result<JsonObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let Some(nested) = self.envelope.nested else {
            let value = self.parents.next()?;
            return self.leaf(value);
        };

        loop {
            if let Some(children) = self.current.as_mut() {
                if let Some(value) = children.next() {
                    return self.leaf(value);
                }
                self.current = None;
            }

            let mut parent = self.parents.next()?;
            let index = self.parent_index;
            self.parent_index += 1;

            match parent.get_mut(nested).map(Value::take) {
                Some(Value::Array(children)) => self.current = Some(children.into_iter()),
                _ => {
                    return self.fail(format!(
                        "'data.{}[{index}].{nested}' is missing or not an array",
                        self.envelope.collection
                    ))
                }
            }
        }
    }
}
