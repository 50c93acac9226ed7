//! Field projection
//!
//! Clients can ask for a subset of an entity's attributes with
//! `fields=name,surname`. The projection walks the entity's declared
//! attributes in declaration order and keeps the requested ones, so the
//! output order never depends on the order of the request.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec;
use crate::entity::Entity;

/// Projection failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The entity could not be read as a set of attributes
    #[error("cannot read attribute `{attribute}` of {kind}: {reason}")]
    UnreadableAttribute {
        /// Entity kind
        kind: &'static str,
        /// Attribute being read, or `*` when the whole entity failed
        attribute: String,
        /// Underlying cause
        reason: String,
    },
}

/// A requested set of attribute names
///
/// # Example
///
/// ```rust
/// use entity_rest::projection::FieldSet;
///
/// let fields = FieldSet::parse(Some("name,surname")).unwrap();
/// assert!(fields.contains("surname"));
/// assert!(FieldSet::parse(Some("")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    /// Parse a raw `fields` parameter; absent or empty means "everything"
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let names: Vec<String> = raw?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        (!names.is_empty()).then_some(Self(names))
    }

    /// Whether an attribute was requested
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|field| field == name)
    }

    /// Requested names, in request order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Project one entity onto the requested attributes
///
/// Undeclared names are ignored. A declared, requested attribute that the
/// entity's serialized form leaves out comes back as `null`.
pub fn project<E: Entity>(entity: &E, fields: &FieldSet) -> Result<Map<String, Value>, ProjectionError> {
    let mut source = match codec::to_value(entity) {
        Ok(Value::Object(source)) => source,
        Ok(other) => {
            return Err(unreadable::<E>(
                "*",
                format!("serialized as {} instead of an object", json_type(&other)),
            ))
        }
        Err(err) => return Err(unreadable::<E>("*", err.to_string())),
    };

    let mut projected = Map::new();
    for attribute in E::attributes() {
        if fields.contains(attribute.name) {
            let value = source.remove(attribute.name).unwrap_or(Value::Null);
            projected.insert(attribute.name.to_string(), value);
        }
    }
    tracing::debug!(kind = E::KIND, fields = ?fields.names(), "projected entity");
    Ok(projected)
}

/// Encode an entity as JSON, projected when fields were requested
pub fn render<E: Entity>(entity: &E, fields: Option<&FieldSet>) -> Result<Value, ProjectionError> {
    match fields {
        Some(fields) => project(entity, fields).map(Value::Object),
        None => codec::to_value(entity).map_err(|err| unreadable::<E>("*", err.to_string())),
    }
}

fn unreadable<E: Entity>(attribute: &str, reason: String) -> ProjectionError {
    ProjectionError::UnreadableAttribute {
        kind: E::KIND,
        attribute: attribute.to_string(),
        reason,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
