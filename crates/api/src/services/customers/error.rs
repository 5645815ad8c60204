//! Customer service error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::password::PasswordHashError;

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// No customer matched the lookup.
    #[error("{0}")]
    NotFound(String),

    /// Another customer already uses the email.
    #[error("email already in use")]
    EmailTaken,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<PasswordHashError> for CustomerError {
    fn from(_: PasswordHashError) -> Self {
        Self::PasswordHash
    }
}

impl CustomerError {
    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_owned())
    }
}
