//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::{PgCategoryStore, PgCustomerStore, PgProductStore};
use crate::services::{Argon2PasswordEncoder, CategoryService, CustomerService, ProductService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    encoder: Argon2PasswordEncoder,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                encoder: Argon2PasswordEncoder,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Customer service bound to the pool.
    #[must_use]
    pub fn customers(&self) -> CustomerService<PgCustomerStore<'_>, Argon2PasswordEncoder> {
        CustomerService::new(PgCustomerStore::new(self.pool()), self.inner.encoder)
    }

    /// Category service bound to the pool.
    #[must_use]
    pub fn categories(&self) -> CategoryService<PgCategoryStore<'_>> {
        CategoryService::new(PgCategoryStore::new(self.pool()))
    }

    /// Product service bound to the pool.
    #[must_use]
    pub fn products(&self) -> ProductService<PgProductStore<'_>, PgCategoryStore<'_>> {
        ProductService::new(PgProductStore::new(self.pool()), PgCategoryStore::new(self.pool()))
    }
}
