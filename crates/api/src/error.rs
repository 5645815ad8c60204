//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Every error response carries a JSON body `{"status": <code>, "error": <message>}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CatalogError, CustomerError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer operation failed.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Database operation failed outside a service.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client (malformed body or failed validation).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Customer(err) => match err {
                CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
                CustomerError::EmailTaken
                | CustomerError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                CustomerError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                CustomerError::PasswordHash | CustomerError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) | CatalogError::Repository(RepositoryError::NotFound) => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                CatalogError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        if self.status().is_server_error() {
            // Don't expose internal error details to clients
            return "Internal server error".to_string();
        }

        match self {
            Self::Customer(CustomerError::NotFound(msg))
            | Self::Catalog(CatalogError::NotFound(msg))
            | Self::NotFound(msg)
            | Self::BadRequest(msg) => msg.clone(),
            Self::Customer(CustomerError::EmailTaken) => {
                "A customer with this email already exists".to_string()
            }
            Self::Customer(CustomerError::Repository(RepositoryError::Conflict(_)))
            | Self::Catalog(CatalogError::Repository(RepositoryError::Conflict(_)))
            | Self::Database(RepositoryError::Conflict(_)) => {
                "The request conflicts with existing data".to_string()
            }
            _ => "Not found".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
