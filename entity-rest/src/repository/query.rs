//! Query types spoken between the resource handler and an entity store
//!
//! # Example
//!
//! ```rust
//! use entity_rest::repository::{FilterCondition, StoreQuery};
//!
//! let query = StoreQuery::new(20)
//!     .with_conditions(vec![
//!         FilterCondition::gte("name", "ABC"),
//!         FilterCondition::lt("name", "ABD"),
//!     ])
//!     .with_order_by(Some("name"));
//!
//! assert_eq!(query.limit, 20);
//! assert!(query.cursor.is_none());
//! ```

use std::fmt;

use crate::pagination::Cursor;

/// Comparison operators a filter predicate can use
///
/// # Example
///
/// ```rust
/// use entity_rest::repository::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::Equal), "=");
/// assert_eq!(format!("{}", FilterOperator::LessThan), "<");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
        }
    }
}

/// A single predicate over one attribute
///
/// Values arrive from the query string, so they are always text; the store
/// decides how to compare them against the stored attribute.
///
/// # Example
///
/// ```rust
/// use entity_rest::repository::{FilterCondition, FilterOperator};
///
/// let filter = FilterCondition::eq("surname", "Rossi");
/// assert_eq!(filter.operator, FilterOperator::Equal);
/// assert_eq!(filter.to_string(), "surname = Rossi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The attribute name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: String,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Equal, value)
    }

    /// Create a greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value)
    }

    /// Create a less-than filter (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// One page-sized query against a store
///
/// Conditions are ANDed. `cursor` resumes a previous query with the same
/// conditions and ordering; a store may reject a cursor issued for a
/// different query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    /// Predicates, all of which must hold
    pub conditions: Vec<FilterCondition>,
    /// Maximum number of entities to return
    pub limit: usize,
    /// Resume point from a previous page
    pub cursor: Option<Cursor>,
    /// Attribute to order by; `None` means key order
    pub order_by: Option<String>,
}

impl StoreQuery {
    /// Unfiltered query from the start of the collection
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            conditions: Vec::new(),
            limit,
            cursor: None,
            order_by: None,
        }
    }

    /// Replace the predicates
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<FilterCondition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Resume from a cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Order by the given attribute
    #[must_use]
    pub fn with_order_by(mut self, order_by: Option<&str>) -> Self {
        self.order_by = order_by.map(str::to_string);
        self
    }
}

/// Entities returned by one store query
///
/// `cursor` points just past the last returned entity. Stores may omit it
/// when they know the result set is exhausted.
#[derive(Debug, Clone)]
pub struct QueryBatch<E> {
    /// Entities in query order
    pub entities: Vec<E>,
    /// Continuation point for the next page
    pub cursor: Option<Cursor>,
}

impl<E> QueryBatch<E> {
    /// Batch with a continuation cursor
    pub fn new(entities: Vec<E>, cursor: Option<Cursor>) -> Self {
        Self { entities, cursor }
    }

    /// Batch with no continuation
    pub fn last(entities: Vec<E>) -> Self {
        Self {
            entities,
            cursor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_operator_display() {
        assert_eq!(format!("{}", FilterOperator::Equal), "=");
        assert_eq!(format!("{}", FilterOperator::GreaterThanOrEqual), ">=");
        assert_eq!(format!("{}", FilterOperator::LessThan), "<");
    }

    #[test]
    fn test_filter_condition_builders() {
        let gte = FilterCondition::gte("name", "ABC");
        assert_eq!(gte.field, "name");
        assert_eq!(gte.operator, FilterOperator::GreaterThanOrEqual);
        assert_eq!(gte.value, "ABC");

        let lt = FilterCondition::lt("name", "ABD");
        assert_eq!(lt.to_string(), "name < ABD");
    }

    #[test]
    fn test_store_query_builder() {
        let query = StoreQuery::new(3)
            .with_conditions(vec![FilterCondition::eq("address", "Test")])
            .with_cursor(Some(Cursor::new("abc")))
            .with_order_by(None);
        assert_eq!(query.limit, 3);
        assert_eq!(query.conditions.len(), 1);
        assert_eq!(query.cursor, Some(Cursor::new("abc")));
        assert!(query.order_by.is_none());
    }

    #[test]
    fn test_last_batch_has_no_cursor() {
        let batch = QueryBatch::last(vec![1, 2]);
        assert_eq!(batch.entities, vec![1, 2]);
        assert!(batch.cursor.is_none());
    }
}
