//! Query parameters for resource endpoints
//!
//! Raw parameters are deserialized into [`ListQuery`] / [`ItemQuery`] by
//! axum and then parsed once into an immutable [`ListRequest`] before any
//! store call, so every client-input error surfaces before the store is
//! touched.
//!
//! # Example
//!
//! ```rust
//! use entity_rest::handlers::{ListQuery, ListRequest};
//!
//! let query = ListQuery::default()
//!     .with_filter("name:Felix")
//!     .with_fields("name,surname");
//!
//! match query.parse().unwrap() {
//!     ListRequest::Query { filter, cursor, fields } => {
//!         assert_eq!(filter.conditions.len(), 1);
//!         assert!(cursor.is_none());
//!         assert!(fields.unwrap().contains("surname"));
//!     }
//!     other => panic!("unexpected request: {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiOperation};
use crate::codec::KeyId;
use crate::filter::{parse_filter, FilterSet};
use crate::pagination::Cursor;
use crate::projection::FieldSet;

/// Query parameters for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Comma-separated attribute names to project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,

    /// `name:value` filter components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Comma-separated numeric ids for a bulk fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,

    /// Any value requests the indexed attribute names
    #[serde(rename = "indexAttributes", skip_serializing_if = "Option::is_none")]
    pub index_attributes: Option<String>,

    /// Resume token from a previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl ListQuery {
    /// Create a new empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projected fields
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Set the filter expression
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Request a bulk fetch
    #[must_use]
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    /// Request the indexed attribute names
    #[must_use]
    pub fn with_index_attributes(mut self) -> Self {
        self.index_attributes = Some(String::new());
        self
    }

    /// Resume from a cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Parse into a request, checking `set`, then `indexAttributes`, then the filter
    pub fn parse(&self) -> Result<ListRequest, ApiError> {
        let fields = FieldSet::parse(self.fields.as_deref());

        if let Some(set) = &self.set {
            let ids = parse_id_set(set)?;
            return Ok(ListRequest::ByIds { ids, fields });
        }

        if self.index_attributes.is_some() {
            return Ok(ListRequest::IndexAttributes);
        }

        let filter = match self.filter.as_deref() {
            Some(raw) => parse_filter(raw)?,
            None => FilterSet::default(),
        };
        Ok(ListRequest::Query {
            filter,
            cursor: Cursor::from_request(self.cursor.as_deref()),
            fields,
        })
    }
}

fn parse_id_set(raw: &str) -> Result<Vec<KeyId>, ApiError> {
    raw.split(',')
        .filter(|component| !component.is_empty())
        .map(|component| {
            KeyId::parse_id(component)
                .map_err(|_| ApiError::malformed_identifier(ApiOperation::List, component))
        })
        .collect()
}

/// A parsed list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    /// Bulk fetch by id, in request order, without a metadata record
    ByIds {
        /// Requested ids
        ids: Vec<KeyId>,
        /// Projection, if any
        fields: Option<FieldSet>,
    },
    /// List the indexed attribute names
    IndexAttributes,
    /// Filtered, paginated query
    Query {
        /// Parsed filter
        filter: FilterSet,
        /// Resume point
        cursor: Option<Cursor>,
        /// Projection, if any
        fields: Option<FieldSet>,
    },
}

/// Query parameters for `GET /{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Comma-separated attribute names to project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

impl ItemQuery {
    /// Set the projected fields
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// The parsed projection, if any
    #[must_use]
    pub fn field_set(&self) -> Option<FieldSet> {
        FieldSet::parse(self.fields.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::handlers::ApiErrorKind;

    #[test]
    fn test_empty_query_is_unfiltered_listing() {
        let request = ListQuery::new().parse().unwrap();
        assert_eq!(
            request,
            ListRequest::Query {
                filter: FilterSet::default(),
                cursor: None,
                fields: None,
            }
        );
    }

    #[test]
    fn test_set_takes_precedence() {
        let request = ListQuery::new()
            .with_set("3,,1")
            .with_index_attributes()
            .with_filter("broken")
            .parse()
            .unwrap();
        assert_eq!(
            request,
            ListRequest::ByIds {
                ids: vec![KeyId::Id(3), KeyId::Id(1)],
                fields: None,
            }
        );
    }

    #[test]
    fn test_index_attributes_before_filter() {
        let request = ListQuery::new()
            .with_index_attributes()
            .with_filter("broken")
            .parse()
            .unwrap();
        assert_eq!(request, ListRequest::IndexAttributes);
    }

    #[test]
    fn test_malformed_set_id() {
        let err = ListQuery::new().with_set("1,abc").parse().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::MalformedIdentifier);
        assert_eq!(err.more_info.as_deref(), Some("abc"));
    }

    #[test]
    fn test_bad_filter_is_reported() {
        let err = ListQuery::new().with_filter("name").parse().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadFilterSyntax);
    }

    #[test]
    fn test_range_filter_and_cursor() {
        let request = ListQuery::new()
            .with_filter("name:ABC,name_option:")
            .with_cursor("tok")
            .parse()
            .unwrap();
        match request {
            ListRequest::Query { filter, cursor, .. } => {
                assert_eq!(filter.mode, FilterMode::Range);
                assert_eq!(cursor, Some(Cursor::new("tok")));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_empty_fields_and_cursor_are_absent() {
        let request = ListQuery::new()
            .with_fields("")
            .with_cursor("")
            .parse()
            .unwrap();
        assert_eq!(
            request,
            ListRequest::Query {
                filter: FilterSet::default(),
                cursor: None,
                fields: None,
            }
        );
    }

    #[test]
    fn test_list_query_serde() {
        let query: ListQuery =
            serde_json::from_str(r#"{"indexAttributes":"","fields":"name"}"#).unwrap();
        assert_eq!(query.index_attributes.as_deref(), Some(""));
        assert_eq!(query.fields.as_deref(), Some("name"));
    }

    #[test]
    fn test_item_query_field_set() {
        assert!(ItemQuery::default().field_set().is_none());
        let fields = ItemQuery::default().with_fields("name").field_set().unwrap();
        assert!(fields.contains("name"));
    }
}
