//! Menu catalog services: categories and the products listed under them.

mod categories;
mod products;

pub use categories::{CategoryService, CategoryUpdate, NewCategory};
pub use products::{NewProduct, ProductService, ProductUpdate};

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No category or product matched.
    #[error("{0}")]
    NotFound(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_owned())
    }
}
