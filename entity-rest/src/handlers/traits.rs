//! Handler trait definitions for REST collection endpoints
//!
//! [`CollectionHandler`] is the seam between axum routing and resource
//! logic. It uses RPITIT (Return Position Impl Trait In Traits) so
//! implementations are written with plain `async fn`.
//!
//! The crate ships one implementation,
//! [`ResourceHandler`](super::ResourceHandler); [`router`](super::router)
//! mounts any implementation under the five standard routes.

use std::future::Future;

use super::error::ApiError;
use super::query::{ItemQuery, ListQuery};
use super::response::{ItemResponse, ListResponse};

/// REST operations over one entity collection
///
/// Ids arrive as raw path segments and bodies as raw bytes so that parse
/// failures are reported as [`ApiError`]s with the offending input instead
/// of axum rejections.
pub trait CollectionHandler: Send + Sync {
    /// List, filter and paginate; or bulk-fetch; or list indexed attributes
    fn list(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListResponse, ApiError>> + Send;

    /// Fetch one entity by its numeric id
    fn get(
        &self,
        id: &str,
        query: ItemQuery,
    ) -> impl Future<Output = Result<ItemResponse, ApiError>> + Send;

    /// Persist a new entity; the body must not carry a numeric id
    fn create(&self, body: &[u8]) -> impl Future<Output = Result<ItemResponse, ApiError>> + Send;

    /// Replace an entity; the body must carry its id
    fn update(&self, body: &[u8]) -> impl Future<Output = Result<ItemResponse, ApiError>> + Send;

    /// Remove an entity; removing a missing id succeeds
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}
