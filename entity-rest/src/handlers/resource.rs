//! Generic resource handler
//!
//! [`ResourceHandler`] binds one entity kind to one store and implements
//! [`CollectionHandler`] for it: filter parsing, pagination, projection and
//! the create/update id rules all live here.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use entity_rest::prelude::*;
//!
//! let store = Arc::new(MemoryStore::<Customer>::new());
//! let customers = ResourceHandler::new(store, &config.resource);
//! let app = Router::new().nest("/customers", customers.router());
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use axum::Router;
use serde_json::Value;
use tracing::{debug, info};

use super::error::{ApiError, ApiOperation};
use super::query::{ItemQuery, ListQuery, ListRequest};
use super::response::{ItemResponse, ListResponse};
use super::routes::router;
use super::traits::CollectionHandler;
use crate::codec::{self, KeyId};
use crate::config::ResourceConfig;
use crate::entity::Entity;
use crate::pagination::Paginator;
use crate::projection::{render, FieldSet};
use crate::repository::EntityStore;

/// REST resource for entities of kind `E` stored in `S`
///
/// Immutable after construction; cloning shares the store.
pub struct ResourceHandler<E, S> {
    store: Arc<S>,
    paginator: Paginator,
    kind: PhantomData<fn() -> E>,
}

impl<E, S> ResourceHandler<E, S>
where
    E: Entity,
    S: EntityStore<E> + 'static,
{
    /// Create a handler using the configured page size
    pub fn new(store: Arc<S>, config: &ResourceConfig) -> Self {
        Self::with_paginator(store, Paginator::new(config.max_page_size))
    }

    /// Create a handler with an explicit paginator
    pub fn with_paginator(store: Arc<S>, paginator: Paginator) -> Self {
        Self {
            store,
            paginator,
            kind: PhantomData,
        }
    }

    /// The backing store
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The page size cap
    #[must_use]
    pub fn max_page_size(&self) -> usize {
        self.paginator.max_page_size()
    }

    /// Mount this handler's routes
    pub fn router(self) -> Router {
        router(self)
    }

    fn decode_body(operation: ApiOperation, body: &[u8]) -> Result<E, ApiError> {
        codec::from_json(body).map_err(|err| {
            let mut error = ApiError::from(err).with_operation(operation);
            error.entity_type = Some(E::KIND.to_string());
            error
        })
    }

    fn parse_id(operation: ApiOperation, raw: &str) -> Result<KeyId, ApiError> {
        KeyId::parse_id(raw).map_err(|_| ApiError::malformed_identifier(operation, raw))
    }

    fn render_all(
        entities: &[E],
        fields: Option<&FieldSet>,
    ) -> Result<Vec<Value>, ApiError> {
        entities
            .iter()
            .map(|entity| render(entity, fields).map_err(ApiError::from))
            .collect()
    }

    fn render_one(operation: ApiOperation, entity: &E) -> Result<ItemResponse, ApiError> {
        render(entity, None)
            .map(ItemResponse::Found)
            .map_err(|err| ApiError::from(err).with_operation(operation))
    }
}

impl<E, S> Clone for ResourceHandler<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            paginator: self.paginator,
            kind: PhantomData,
        }
    }
}

impl<E, S> CollectionHandler for ResourceHandler<E, S>
where
    E: Entity,
    S: EntityStore<E> + 'static,
{
    async fn list(&self, query: ListQuery) -> Result<ListResponse, ApiError> {
        info!(
            kind = E::KIND,
            fields = ?query.fields,
            filter = ?query.filter,
            set = ?query.set,
            cursor = ?query.cursor,
            "list request"
        );

        match query.parse()? {
            ListRequest::ByIds { ids, fields } => {
                let entities = self.store.find_many(&ids).await?;
                debug!(kind = E::KIND, requested = ids.len(), count = entities.len(), "bulk fetch");
                Ok(ListResponse::elements(Self::render_all(
                    &entities,
                    fields.as_ref(),
                )?))
            }
            ListRequest::IndexAttributes => {
                let names = E::indexed_attributes().into_iter().map(Value::from).collect();
                Ok(ListResponse::elements(names))
            }
            ListRequest::Query {
                filter,
                cursor,
                fields,
            } => {
                for condition in &filter.conditions {
                    info!(kind = E::KIND, condition = %condition, "filter bound");
                }
                let store_query =
                    self.paginator
                        .query(filter.conditions, cursor, E::default_ordering());
                let page = self.paginator.finish(self.store.query(&store_query).await?);
                debug!(
                    kind = E::KIND,
                    count = page.items.len(),
                    has_more = page.meta.has_more(),
                    "list page"
                );
                let elements = Self::render_all(&page.items, fields.as_ref())?;
                Ok(ListResponse::page(elements, page.meta))
            }
        }
    }

    async fn get(&self, id: &str, query: ItemQuery) -> Result<ItemResponse, ApiError> {
        let key = Self::parse_id(ApiOperation::Get, id)?;
        info!(kind = E::KIND, id = %key, fields = ?query.fields, "get request");

        let found = self
            .store
            .find(&key)
            .await
            .map_err(|err| ApiError::from(err).with_operation(ApiOperation::Get))?;
        match found {
            Some(entity) => render(&entity, query.field_set().as_ref())
                .map(ItemResponse::Found)
                .map_err(|err| ApiError::from(err).with_operation(ApiOperation::Get)),
            None => {
                debug!(kind = E::KIND, id = %key, "entity not found");
                Ok(ItemResponse::Missing)
            }
        }
    }

    async fn create(&self, body: &[u8]) -> Result<ItemResponse, ApiError> {
        let entity = Self::decode_body(ApiOperation::Create, body)?;
        if let Some(key @ KeyId::Id(_)) = entity.key() {
            return Err(ApiError::unexpected_identifier(E::KIND, key.to_string()));
        }

        info!(kind = E::KIND, "creating entity");
        let saved = self
            .store
            .save(entity)
            .await
            .map_err(|err| ApiError::from(err).with_operation(ApiOperation::Create))?;
        debug!(kind = E::KIND, id = ?saved.key(), "entity created");
        Self::render_one(ApiOperation::Create, &saved)
    }

    async fn update(&self, body: &[u8]) -> Result<ItemResponse, ApiError> {
        let entity = Self::decode_body(ApiOperation::Update, body)?;
        let Some(key) = entity.key() else {
            return Err(ApiError::missing_identifier(E::KIND));
        };

        info!(kind = E::KIND, id = %key, "updating entity");
        let saved = self
            .store
            .save(entity)
            .await
            .map_err(|err| ApiError::from(err).with_operation(ApiOperation::Update))?;
        debug!(kind = E::KIND, id = %key, "entity updated");
        Self::render_one(ApiOperation::Update, &saved)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let key = Self::parse_id(ApiOperation::Delete, id)?;
        let removed = self
            .store
            .delete(&key)
            .await
            .map_err(|err| ApiError::from(err).with_operation(ApiOperation::Delete))?;
        info!(kind = E::KIND, id = %key, removed, "deleting entity");
        Ok(())
    }
}
