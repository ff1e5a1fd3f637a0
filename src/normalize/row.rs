//! Field-level reshaping operations on one row

use crate::error::{Error, Result};
use crate::streams::{EntityType, StreamDef};
use crate::types::{JsonObject, JsonValue};
use serde_json::{Number, Value};

/// How one field of a nested object maps onto a flat column
#[derive(Debug, Clone, Copy)]
pub(super) struct Flatten {
    /// Key inside the nested object
    pub from: &'static str,
    /// Flat column it lands in
    pub to: &'static str,
    /// Value used when the object or the key is null
    pub fallback: Fallback,
}

/// Fallback for a flattened column
#[derive(Debug, Clone, Copy)]
pub(super) enum Fallback {
    Zero,
    Empty,
    /// No fallback; the column stays absent and must come from elsewhere
    Absent,
}

impl Fallback {
    fn value(self) -> Option<JsonValue> {
        match self {
            Fallback::Zero => Some(Value::from(0)),
            Fallback::Empty => Some(Value::from("")),
            Fallback::Absent => None,
        }
    }
}

impl Flatten {
    pub const fn new(from: &'static str, to: &'static str, fallback: Fallback) -> Self {
        Self { from, to, fallback }
    }
}

/// A record being reshaped for one stream
#[derive(Debug)]
pub(super) struct Row {
    entity: EntityType,
    fields: JsonObject,
}

impl Row {
    pub fn new(entity: EntityType, fields: JsonObject) -> Self {
        Self { entity, fields }
    }

    fn invalid(&self, field: &str, message: impl Into<String>) -> Error {
        Error::invalid_field(self.entity.name(), field, message)
    }

    /// Explode a nested object into flat columns
    ///
    /// A null object takes the fallbacks. An absent object keeps columns
    /// already present, so a row that was flattened before is unchanged.
    pub fn flatten(&mut self, field: &str, mapping: &[Flatten]) -> Result<()> {
        match self.fields.remove(field) {
            Some(Value::Object(nested)) => {
                for m in mapping {
                    match nested.get(m.from) {
                        Some(value) if !value.is_null() => {
                            self.fields.insert(m.to.to_string(), value.clone());
                        }
                        _ => self.set_fallback(m),
                    }
                }
            }
            Some(Value::Null) => {
                for m in mapping {
                    self.set_fallback(m);
                }
            }
            None => {
                for m in mapping {
                    if self.fields.get(m.to).map_or(true, Value::is_null) {
                        self.set_fallback(m);
                    }
                }
            }
            Some(other) => {
                return Err(self.invalid(field, format!("expected an object, found {other}")));
            }
        }
        Ok(())
    }

    fn set_fallback(&mut self, mapping: &Flatten) {
        match mapping.fallback.value() {
            Some(value) => {
                self.fields.insert(mapping.to.to_string(), value);
            }
            None => {
                self.fields.remove(mapping.to);
            }
        }
    }

    /// Coerce a field to an integer; null or absent takes `default` if given
    pub fn coerce_int(&mut self, field: &str, default: Option<i64>) -> Result<()> {
        let current = self.fields.get(field).filter(|v| !v.is_null());
        let coerced = match current {
            Some(value) => Some(
                super::value_as_i64(value)
                    .ok_or_else(|| self.invalid(field, format!("'{value}' is not an integer")))?,
            ),
            None => default,
        };

        if let Some(id) = coerced {
            self.fields.insert(field.to_string(), Value::from(id));
        }
        Ok(())
    }

    /// Coerce a field to a float; null or absent is left alone
    pub fn coerce_float(&mut self, field: &str) -> Result<()> {
        let Some(value) = self.fields.get(field).filter(|v| !v.is_null()) else {
            return Ok(());
        };

        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let number = parsed
            .and_then(Number::from_f64)
            .ok_or_else(|| self.invalid(field, format!("'{value}' is not a number")))?;

        self.fields.insert(field.to_string(), Value::Number(number));
        Ok(())
    }

    /// Set a parent foreign key from context; without context the payload
    /// value (if any) is kept and coerced
    pub fn inject_parent(&mut self, field: &str, from_context: Option<i64>) -> Result<()> {
        match from_context {
            Some(id) => {
                self.fields.insert(field.to_string(), Value::from(id));
                Ok(())
            }
            None => self.coerce_int(field, None),
        }
    }

    /// Copy `from` into `to` when `from` is present
    pub fn derive(&mut self, to: &str, from: &str) {
        if let Some(value) = self.fields.get(from).cloned() {
            self.fields.insert(to.to_string(), value);
        }
    }

    /// Replace an opaque structured value with its JSON text; null or
    /// absent becomes the empty string
    pub fn serialize_json(&mut self, field: &str) -> Result<()> {
        let text = match self.fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(value) => serde_json::to_string(value)?,
        };
        self.fields.insert(field.to_string(), Value::String(text));
        Ok(())
    }

    /// Set a field unconditionally
    pub fn set(&mut self, field: &str, value: impl Into<JsonValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Keep exactly the declared fields
    ///
    /// Undeclared keys are dropped; nullable fields missing upstream become
    /// null; a missing non-nullable field is an error naming it.
    pub fn project(mut self, def: &StreamDef) -> Result<JsonObject> {
        let mut shaped = JsonObject::new();
        for field in def.fields {
            match self.fields.remove(field.name) {
                Some(value) if !value.is_null() => {
                    shaped.insert(field.name.to_string(), value);
                }
                _ if field.nullable => {
                    shaped.insert(field.name.to_string(), Value::Null);
                }
                _ => return Err(Error::normalization(def.name, field.name)),
            }
        }
        Ok(shaped)
    }
}
