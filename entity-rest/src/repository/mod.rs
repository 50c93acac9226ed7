//! Entity store abstraction
//!
//! The resource handler reads and writes entities through the
//! [`EntityStore`] trait and never sees a storage engine directly.
//!
//! # Features
//!
//! - **Store trait**: [`EntityStore`] for query, fetch, bulk fetch, save and delete
//! - **Predicates**: [`FilterCondition`] for equality and range filters
//! - **Paged queries**: [`StoreQuery`] and [`QueryBatch`] carrying opaque cursors
//! - **Reference store**: [`MemoryStore`], a key-ordered in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use entity_rest::repository::{FilterCondition, FilterOperator, StoreQuery};
//!
//! let query = StoreQuery::new(20).with_conditions(vec![FilterCondition::eq("surname", "Rossi")]);
//! assert_eq!(query.conditions[0].operator, FilterOperator::Equal);
//! ```

mod error;
mod memory;
mod query;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryStore;
pub use query::{FilterCondition, FilterOperator, QueryBatch, StoreQuery};
pub use traits::{EntityStore, RepositoryResult};
