//! # entity-rest
//!
//! Generic REST resource layer over an entity store. Bind an [`Entity`](entity::Entity)
//! kind to an [`EntityStore`](repository::EntityStore) and get list, get,
//! create, update and delete endpoints with JSON payloads.
//!
//! ## Features
//!
//! - **Filtering**: `filter=name:value,...` equality and prefix-range queries
//! - **Cursor pagination**: bounded pages closed by a `{"_cursor": ...}` record
//! - **Field projection**: `fields=a,b` returns only the named attributes
//! - **Bulk fetch**: `set=1,4,9` returns the entities with those ids
//! - **Wire codec**: fixed ISO-8601 timestamps and scalar entity keys
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use entity_rest::prelude::*;
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Debug, Clone, Serialize, Deserialize)]
//! # struct Customer { #[serde(rename = "_id", default)] id: i64, name: String }
//! # impl Entity for Customer {
//! #     const KIND: &'static str = "Customer";
//! #     fn attributes() -> &'static [Attribute] {
//! #         const A: &[Attribute] = &[Attribute::new("_id"), Attribute::indexed("name")];
//! #         A
//! #     }
//! #     fn key(&self) -> Option<KeyId> { (self.id > 0).then_some(KeyId::Id(self.id)) }
//! #     fn set_key(&mut self, key: KeyId) { if let KeyId::Id(id) = key { self.id = id; } }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Bind the Customer kind to an in-memory store
//!     let customers = ResourceHandler::new(
//!         Arc::new(MemoryStore::<Customer>::new()),
//!         &config.resource,
//!     );
//!
//!     // Create router
//!     let app = Router::new().nest("/customers", customers.router());
//!
//!     // Run server
//!     Server::new(config)
//!         .serve(app)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod observability;
pub mod pagination;
pub mod projection;
pub mod repository;
pub mod server;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{EntityKey, KeyId};
    pub use crate::config::{Config, ResourceConfig, ServiceConfig};
    pub use crate::entity::{Attribute, Entity};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{parse_filter, FilterMode, FilterSet};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, CollectionHandler, ItemResponse, ListResponse, ResourceHandler,
    };
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{Cursor, MetaRecord, Paginator};
    pub use crate::projection::FieldSet;
    pub use crate::repository::{EntityStore, MemoryStore, RepositoryError};
    pub use crate::server::Server;

    pub use std::sync::Arc;

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, post, put},
        Json, Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, warn};
}
