//! Response types for resource endpoints
//!
//! Both types implement `IntoResponse`, so handler methods can return them
//! directly from axum routes.
//!
//! # Example
//!
//! ```rust
//! use entity_rest::handlers::ListResponse;
//! use entity_rest::pagination::MetaRecord;
//! use serde_json::json;
//!
//! let response = ListResponse::page(vec![json!({"name": "Felix"})], MetaRecord::end());
//! assert_eq!(
//!     serde_json::to_value(&response).unwrap(),
//!     json!([{"name": "Felix"}, {"_cursor": ""}])
//! );
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::pagination::MetaRecord;

/// Outcome of a single-entity request
///
/// A missing entity is a regular outcome rather than an error: it renders as
/// an empty object with status 404.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemResponse {
    /// The entity, fully encoded or projected
    Found(Value),
    /// No entity has the requested id
    Missing,
}

impl ItemResponse {
    /// Whether an entity was found
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The entity body, if found
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }
}

impl IntoResponse for ItemResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Found(value) => (StatusCode::OK, Json(value)).into_response(),
            Self::Missing => (StatusCode::NOT_FOUND, Json(Map::new())).into_response(),
        }
    }
}

/// Body of a list request
///
/// Serialized as one JSON array. Paginated listings end with their
/// [`MetaRecord`]; bulk fetches and attribute listings carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    /// Encoded entities (or attribute names), in order
    pub elements: Vec<Value>,
    /// Trailing metadata record
    pub meta: Option<MetaRecord>,
}

impl ListResponse {
    /// A page of a paginated listing
    #[must_use]
    pub fn page(elements: Vec<Value>, meta: MetaRecord) -> Self {
        Self {
            elements,
            meta: Some(meta),
        }
    }

    /// A plain array without metadata
    #[must_use]
    pub fn elements(elements: Vec<Value>) -> Self {
        Self {
            elements,
            meta: None,
        }
    }

    /// Number of elements, not counting the metadata record
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if no elements were returned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Serialize for ListResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.meta.is_some());
        let mut seq = serializer.serialize_seq(Some(self.elements.len() + extra))?;
        for element in &self.elements {
            seq.serialize_element(element)?;
        }
        if let Some(meta) = &self.meta {
            seq.serialize_element(meta)?;
        }
        seq.end()
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
