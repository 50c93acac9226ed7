//! API error types for resource operations
//!
//! Every failure a resource handler can report is an [`ApiError`]. It maps to
//! an HTTP status through its [`ApiErrorKind`] and renders as the JSON body
//! clients expect:
//!
//! ```json
//! {"message": "...", "errorCode": "BAD_FILTER_SYNTAX", "moreInfo": "name=Felix"}
//! ```
//!
//! # Example
//!
//! ```rust
//! use entity_rest::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::bad_filter("name=Felix", "filter component `name=Felix` must be of format <name>:<value>");
//! assert!(matches!(error.kind, ApiErrorKind::BadFilterSyntax));
//! assert_eq!(error.kind.error_code(), "BAD_FILTER_SYNTAX");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::codec::CodecError;
use crate::filter::FilterError;
use crate::projection::ProjectionError;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing, filtering or bulk-fetching entities
    List,
    /// Getting a single entity by id
    Get,
    /// Creating a new entity
    Create,
    /// Replacing an existing entity
    Update,
    /// Deleting an entity
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The query string could not be read into the endpoint's parameters
    BadQuery,
    /// The `filter` parameter is not a list of `<name>:<value>` components
    BadFilterSyntax,
    /// A date/time value could not be parsed
    MalformedTimestamp,
    /// An entity id could not be parsed
    MalformedIdentifier,
    /// The request body is not a valid entity document
    MalformedBody,
    /// An entity could not be projected onto the requested fields
    UnreadableAttribute,
    /// The `cursor` parameter is not usable for this query
    InvalidCursor,
    /// An update was sent without an entity id
    MissingIdentifier,
    /// A create was sent with an entity id already set
    UnexpectedIdentifier,
    /// Internal server error
    InternalError,
    /// Store temporarily unavailable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadQuery => write!(f, "bad_query"),
            Self::BadFilterSyntax => write!(f, "bad_filter_syntax"),
            Self::MalformedTimestamp => write!(f, "malformed_timestamp"),
            Self::MalformedIdentifier => write!(f, "malformed_identifier"),
            Self::MalformedBody => write!(f, "malformed_body"),
            Self::UnreadableAttribute => write!(f, "unreadable_attribute"),
            Self::InvalidCursor => write!(f, "invalid_cursor"),
            Self::MissingIdentifier => write!(f, "missing_identifier"),
            Self::UnexpectedIdentifier => write!(f, "unexpected_identifier"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }

    /// Whether the client caused the error
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::InternalError | Self::ServiceUnavailable)
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The offending input, echoed back as `moreInfo`
    pub more_info: Option<String>,
    /// The kind of entity involved (e.g., "Customer")
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            more_info: None,
            entity_type: None,
            entity_id: None,
        }
    }

    /// A `filter` component could not be parsed
    pub fn bad_filter(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadFilterSyntax, message)
            .with_more_info(component)
    }

    /// The query string was rejected before reaching the handler
    pub fn bad_query(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::BadQuery, message)
    }

    /// An id in the path or the `set` parameter could not be parsed
    pub fn malformed_identifier(operation: ApiOperation, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::new(
            operation,
            ApiErrorKind::MalformedIdentifier,
            format!("malformed identifier `{}`", raw),
        )
        .with_more_info(raw)
    }

    /// An update body carried no id
    pub fn missing_identifier(entity_type: impl Into<String>) -> Self {
        let mut error = Self::new(
            ApiOperation::Update,
            ApiErrorKind::MissingIdentifier,
            "Entity id is required to update an entity",
        );
        error.entity_type = Some(entity_type.into());
        error
    }

    /// A create body already carried an id
    pub fn unexpected_identifier(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self::new(
            ApiOperation::Create,
            ApiErrorKind::UnexpectedIdentifier,
            "Entity id must be empty when creating an entity",
        )
        .with_entity(entity_type, entity_id)
    }

    /// Create an internal error
    pub fn internal(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InternalError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    ///
    /// # Example
    ///
    /// ```rust
    /// use entity_rest::handlers::{ApiError, ApiOperation};
    ///
    /// let error = ApiError::internal(ApiOperation::Get, "store failure")
    ///     .with_operation(ApiOperation::Create);
    /// assert_eq!(error.operation, ApiOperation::Create);
    /// ```
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Attach the offending input
    #[must_use]
    pub fn with_more_info(mut self, more_info: impl Into<String>) -> Self {
        self.more_info = Some(more_info.into());
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorResponse {
    message: String,
    error_code: String,
    more_info: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if self.kind.is_client_error() {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                more_info = ?self.more_info,
                "API error: {}", self.message
            );
        } else {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            message: self.message,
            error_code: code,
            more_info: self.more_info.unwrap_or_default(),
        };

        (status, Json(response)).into_response()
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match &err {
            FilterError::BadSyntax { component } => Self::bad_filter(component.clone(), err.to_string()),
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        let kind = match &err {
            CodecError::MalformedTimestamp { .. } => ApiErrorKind::MalformedTimestamp,
            CodecError::MalformedIdentifier { .. } => ApiErrorKind::MalformedIdentifier,
            CodecError::Json(_) => ApiErrorKind::MalformedBody,
        };
        let more_info = err.raw().map(str::to_string);
        let mut error = Self::new(ApiOperation::Create, kind, err.to_string());
        error.more_info = more_info;
        error
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        match &err {
            ProjectionError::UnreadableAttribute {
                kind, attribute, ..
            } => {
                let mut error = Self::new(
                    ApiOperation::List,
                    ApiErrorKind::UnreadableAttribute,
                    err.to_string(),
                )
                .with_more_info(attribute.clone());
                error.entity_type = Some((*kind).to_string());
                error
            }
        }
    }
}

/// Convert RepositoryOperation to ApiOperation
fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::Query | RepositoryOperation::FindMany => ApiOperation::List,
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::Save => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::InvalidCursor => ApiErrorKind::InvalidCursor,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            RepositoryErrorKind::ConstraintViolation
            | RepositoryErrorKind::DatabaseError
            | RepositoryErrorKind::SerializationError
            | RepositoryErrorKind::Other => ApiErrorKind::InternalError,
        };

        // User-facing message (don't expose internal details for internal errors)
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => "Service temporarily unavailable".to_string(),
            ApiErrorKind::InternalError => "An internal error occurred".to_string(),
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            more_info: None,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_api_error_kind_display() {
        assert_eq!(format!("{}", ApiErrorKind::BadFilterSyntax), "bad_filter_syntax");
        assert_eq!(format!("{}", ApiErrorKind::MalformedTimestamp), "malformed_timestamp");
        assert_eq!(format!("{}", ApiErrorKind::UnexpectedIdentifier), "unexpected_identifier");
        assert_eq!(format!("{}", ApiErrorKind::ServiceUnavailable), "service_unavailable");
    }

    #[test]
    fn test_api_error_kind_status_codes() {
        assert_eq!(ApiErrorKind::BadFilterSyntax.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::MalformedBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::InvalidCursor.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiErrorKind::BadQuery.error_code(), "BAD_QUERY");
        assert_eq!(ApiErrorKind::MalformedIdentifier.error_code(), "MALFORMED_IDENTIFIER");
        assert_eq!(ApiErrorKind::MissingIdentifier.error_code(), "MISSING_IDENTIFIER");
    }

    #[test]
    fn test_bad_query_is_client_error() {
        let err = ApiError::bad_query(ApiOperation::List, "duplicate field `fields`");
        assert_eq!(err.kind.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.kind.is_client_error());
        assert_eq!(err.operation, ApiOperation::List);
    }

    #[test]
    fn test_internal_keeps_operation() {
        let err = ApiError::internal(ApiOperation::Delete, "boom");
        assert_eq!(err.operation, ApiOperation::Delete);
        assert_eq!(err.kind, ApiErrorKind::InternalError);
    }

    #[test]
    fn test_from_filter_error() {
        let err: ApiError = FilterError::BadSyntax {
            component: "name".to_string(),
        }
        .into();
        assert_eq!(err.kind, ApiErrorKind::BadFilterSyntax);
        assert_eq!(err.more_info.as_deref(), Some("name"));
    }

    #[test]
    fn test_from_codec_error() {
        let err: ApiError = CodecError::timestamp("yesterday").into();
        assert_eq!(err.kind, ApiErrorKind::MalformedTimestamp);
        assert_eq!(err.more_info.as_deref(), Some("yesterday"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = CodecError::Json(json_err).into();
        assert_eq!(err.kind, ApiErrorKind::MalformedBody);
        assert!(err.more_info.is_none());
    }

    #[test]
    fn test_from_projection_error() {
        let err: ApiError = ProjectionError::UnreadableAttribute {
            kind: "Customer",
            attribute: "*".to_string(),
            reason: "not an object".to_string(),
        }
        .into();
        assert_eq!(err.kind, ApiErrorKind::UnreadableAttribute);
        assert_eq!(err.entity_type.as_deref(), Some("Customer"));
    }

    #[test]
    fn test_from_repository_error_hides_internal_details() {
        let repo_err = RepositoryError::database_error(RepositoryOperation::Save, "disk full")
            .with_entity("Customer", "3");
        let err: ApiError = repo_err.into();
        assert_eq!(err.kind, ApiErrorKind::InternalError);
        assert_eq!(err.operation, ApiOperation::Update);
        assert_eq!(err.message, "An internal error occurred");
        assert_eq!(err.entity_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_from_repository_error_keeps_cursor_message() {
        let repo_err = RepositoryError::invalid_cursor(RepositoryOperation::Query, "stale cursor");
        let err: ApiError = repo_err.into();
        assert_eq!(err.kind, ApiErrorKind::InvalidCursor);
        assert_eq!(err.message, "stale cursor");
    }

    #[test]
    fn test_unavailable_is_retriable() {
        let err: ApiError = RepositoryError::connection_failed("refused").into();
        assert_eq!(err.kind, ApiErrorKind::ServiceUnavailable);
        assert!(err.is_retriable());
    }

    #[test]
    fn test_display_with_entity() {
        let err = ApiError::unexpected_identifier("Customer", "5");
        assert_eq!(
            err.to_string(),
            "API unexpected_identifier error during create: Entity id must be empty when creating an entity [Customer: 5]"
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::bad_filter("name", "bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "bad",
                "errorCode": "BAD_FILTER_SYNTAX",
                "moreInfo": "name"
            })
        );
    }

    #[tokio::test]
    async fn test_into_response_empty_more_info() {
        let response = ApiError::internal(ApiOperation::Delete, "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["moreInfo"], "");
    }
}
