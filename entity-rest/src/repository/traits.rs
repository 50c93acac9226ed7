//! Store trait definitions
//!
//! The resource handler talks to persistence through [`EntityStore`], using
//! RPITIT (Return Position Impl Trait In Traits) so implementations can be
//! written with plain `async fn`.
//!
//! # Example
//!
//! ```rust,ignore
//! use entity_rest::repository::{EntityStore, QueryBatch, RepositoryResult, StoreQuery};
//!
//! struct CustomerStore {
//!     client: DatastoreClient,
//! }
//!
//! impl EntityStore<Customer> for CustomerStore {
//!     async fn query(&self, query: &StoreQuery) -> RepositoryResult<QueryBatch<Customer>> {
//!         let (rows, next) = self.client.run(query).await?;
//!         Ok(QueryBatch::new(rows, next))
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::query::{QueryBatch, StoreQuery};
use crate::codec::KeyId;
use crate::entity::Entity;

/// Result type for store operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence for one entity kind
///
/// Every method is a single round trip. Implementations own atomicity per
/// entity; the handler never locks.
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Run a filtered query, returning at most `query.limit` entities
    ///
    /// When `query.cursor` is set the result resumes just after the entity
    /// where the cursor was issued. The batch cursor, when present, resumes
    /// after the last returned entity.
    fn query(
        &self,
        query: &StoreQuery,
    ) -> impl Future<Output = RepositoryResult<QueryBatch<E>>> + Send;

    /// Fetch a single entity
    ///
    /// Returns `Ok(None)` when no entity has this key.
    fn find(&self, id: &KeyId) -> impl Future<Output = RepositoryResult<Option<E>>> + Send;

    /// Fetch several entities in one round trip
    ///
    /// The result follows the order of `ids`; keys with no entity are skipped.
    fn find_many(&self, ids: &[KeyId]) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// Insert or replace an entity
    ///
    /// An entity with no key is inserted under a freshly assigned numeric id.
    /// Returns the entity as stored, key included.
    fn save(&self, entity: E) -> impl Future<Output = RepositoryResult<E>> + Send;

    /// Remove an entity
    ///
    /// Deleting a key that does not exist is not an error; the return value
    /// reports whether anything was removed.
    fn delete(&self, id: &KeyId) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
