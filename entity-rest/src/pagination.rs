//! Cursor pagination for list responses
//!
//! Every list page is capped at a configured maximum size and closes with a
//! metadata record carrying the continuation cursor:
//!
//! ```json
//! [
//!   {"_id": 1, "name": "Felix"},
//!   {"_id": 2, "name": "Anna"},
//!   {"_cursor": "MjoxNDQ2..."}
//! ]
//! ```
//!
//! A full page carries the store's cursor; a short page carries the empty
//! string, which tells the client there is nothing left to fetch. When the
//! collection size is an exact multiple of the page size, the last full page
//! still carries a cursor and the request that follows it returns no entities
//! and an empty cursor.
//!
//! Cursors are opaque: they are produced by the store and handed back to it
//! untouched.

use serde::{Deserialize, Serialize};

use crate::repository::{FilterCondition, QueryBatch, StoreQuery};

/// Page size used when none is configured
pub const DEFAULT_MAX_PAGE_SIZE: usize = 20;

/// Opaque continuation token issued by a store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a store-issued token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Wrap a token received from a client; an empty token means "start over"
    #[must_use]
    pub fn from_request(token: Option<&str>) -> Option<Self> {
        token.filter(|token| !token.is_empty()).map(Self::new)
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty end-of-results marker
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trailing element of every paginated list response
///
/// # Example
///
/// ```rust
/// use entity_rest::pagination::MetaRecord;
///
/// let meta = MetaRecord::end();
/// assert_eq!(serde_json::to_string(&meta).unwrap(), r#"{"_cursor":""}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    /// Continuation token, empty when the result set is exhausted
    #[serde(rename = "_cursor")]
    pub cursor: Cursor,
}

impl MetaRecord {
    /// Marker for the last page
    #[must_use]
    pub fn end() -> Self {
        Self {
            cursor: Cursor::default(),
        }
    }

    /// Marker for a page with more results behind it
    #[must_use]
    pub fn continue_from(cursor: Cursor) -> Self {
        Self { cursor }
    }

    /// Whether another page can be requested
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.cursor.is_empty()
    }
}

/// One page of entities plus its metadata record
#[derive(Debug, Clone)]
pub struct Page<E> {
    /// Entities in query order
    pub items: Vec<E>,
    /// Continuation metadata
    pub meta: MetaRecord,
}

/// Turns list requests into bounded store queries and store batches into pages
///
/// # Example
///
/// ```rust
/// use entity_rest::pagination::{Cursor, Paginator};
/// use entity_rest::repository::QueryBatch;
///
/// let paginator = Paginator::new(2);
/// let query = paginator.query(Vec::new(), None, None);
/// assert_eq!(query.limit, 2);
///
/// let page = paginator.finish(QueryBatch::new(vec![1, 2], Some(Cursor::new("next"))));
/// assert_eq!(page.meta.cursor.as_str(), "next");
///
/// let page = paginator.finish(QueryBatch::new(vec![3], Some(Cursor::new("next"))));
/// assert!(!page.meta.has_more());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    max_page_size: usize,
}

impl Paginator {
    /// Create a paginator; sizes below 1 are raised to 1
    #[must_use]
    pub fn new(max_page_size: usize) -> Self {
        Self {
            max_page_size: max_page_size.max(1),
        }
    }

    /// The page size cap
    #[must_use]
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Build the store query for one page
    #[must_use]
    pub fn query(
        &self,
        conditions: Vec<FilterCondition>,
        cursor: Option<Cursor>,
        order_by: Option<&str>,
    ) -> StoreQuery {
        StoreQuery::new(self.max_page_size)
            .with_conditions(conditions)
            .with_cursor(cursor)
            .with_order_by(order_by)
    }

    /// Close a page
    ///
    /// The store cursor is forwarded only when the page is full.
    pub fn finish<E>(&self, batch: QueryBatch<E>) -> Page<E> {
        let QueryBatch { entities, cursor } = batch;
        let meta = match cursor {
            Some(cursor) if entities.len() >= self.max_page_size => {
                MetaRecord::continue_from(cursor)
            }
            _ => MetaRecord::end(),
        };
        Page {
            items: entities,
            meta,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGE_SIZE)
    }
}
