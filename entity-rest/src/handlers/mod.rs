//! REST resource handlers
//!
//! This module turns an [`Entity`](crate::entity::Entity) kind and an
//! [`EntityStore`](crate::repository::EntityStore) into a set of HTTP
//! endpoints with JSON payloads.
//!
//! # Features
//!
//! - **Resource handler**: [`ResourceHandler`], the generic implementation of [`CollectionHandler`]
//! - **Routing**: [`router`] mounts any collection handler on `/` and `/{id}`
//! - **Query parsing**: [`ListQuery`] parsed once into a [`ListRequest`]
//! - **Responses**: [`ListResponse`] (array plus trailing `_cursor` record) and [`ItemResponse`]
//! - **Error handling**: [`ApiError`] with automatic HTTP status code mapping
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::Router;
//! use entity_rest::handlers::ResourceHandler;
//! use entity_rest::repository::MemoryStore;
//!
//! let customers = ResourceHandler::new(Arc::new(MemoryStore::<Customer>::new()), &config.resource);
//! let app = Router::new().nest("/customers", customers.router());
//! ```
//!
//! ```text
//! GET    /customers?filter=name:Fel,name_option:&fields=name,surname
//! GET    /customers?set=1,4,9
//! GET    /customers?indexAttributes
//! GET    /customers/42
//! POST   /customers
//! PUT    /customers
//! DELETE /customers/42
//! ```

mod error;
mod query;
mod resource;
mod response;
mod routes;
mod traits;

// Re-export all public types
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::{ItemQuery, ListQuery, ListRequest};
pub use resource::ResourceHandler;
pub use response::{ItemResponse, ListResponse};
pub use routes::router;
pub use traits::CollectionHandler;
