//! Axum routes for a collection handler
//!
//! | Verb | Path | Operation |
//! |---|---|---|
//! | GET | `/` | [`CollectionHandler::list`] |
//! | POST | `/` | [`CollectionHandler::create`] |
//! | PUT | `/` | [`CollectionHandler::update`] |
//! | GET | `/{id}` | [`CollectionHandler::get`] |
//! | DELETE | `/{id}` | [`CollectionHandler::delete`] |
//!
//! Mount the returned router under the entity's collection path with
//! `Router::nest`. Extractor rejections and ids with extra path segments are
//! answered with an [`ApiError`] body like every other client error.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, StatusCode},
    routing::{any, get},
    Router,
};

use super::error::{ApiError, ApiOperation};
use super::query::{ItemQuery, ListQuery};
use super::response::{ItemResponse, ListResponse};
use super::traits::CollectionHandler;

/// Build the router for a collection handler
pub fn router<H>(handler: H) -> Router
where
    H: CollectionHandler + 'static,
{
    Router::new()
        .route(
            "/",
            get(list::<H>).post(create::<H>).put(update::<H>),
        )
        .route("/{id}", get(fetch::<H>).delete(remove::<H>))
        .route("/{id}/{*rest}", any(nested_path))
        .with_state(Arc::new(handler))
}

fn query_params<T>(
    operation: ApiOperation,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_query(operation, rejection.body_text()))
}

fn path_id(
    operation: ApiOperation,
    path: Result<Path<String>, PathRejection>,
) -> Result<String, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::malformed_identifier(operation, rejection.body_text()))
}

async fn list<H: CollectionHandler>(
    State(handler): State<Arc<H>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError> {
    let query = query_params(ApiOperation::List, query)?;
    handler.list(query).await
}

async fn fetch<H: CollectionHandler>(
    State(handler): State<Arc<H>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<ItemResponse, ApiError> {
    let id = path_id(ApiOperation::Get, path)?;
    let query = query_params(ApiOperation::Get, query)?;
    handler.get(&id, query).await
}

async fn create<H: CollectionHandler>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<ItemResponse, ApiError> {
    handler.create(&body).await
}

async fn update<H: CollectionHandler>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<ItemResponse, ApiError> {
    handler.update(&body).await
}

async fn remove<H: CollectionHandler>(
    State(handler): State<Arc<H>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(ApiOperation::Delete, path)?;
    handler.delete(&id).await?;
    Ok(StatusCode::OK)
}

/// `/{id}/...` never names an entity
async fn nested_path(method: Method, Path((id, rest)): Path<(String, String)>) -> ApiError {
    let operation = match method {
        Method::DELETE => ApiOperation::Delete,
        Method::POST => ApiOperation::Create,
        Method::PUT => ApiOperation::Update,
        _ => ApiOperation::Get,
    };
    ApiError::malformed_identifier(operation, format!("{id}/{rest}"))
}
