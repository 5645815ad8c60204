//! Database operations for the Sushi API `PostgreSQL` store.
//!
//! # Schema: `sushi`
//!
//! ## Tables
//!
//! - `customer` - Customer aggregate root (unique `email`)
//! - `phone` - One phone per customer (owned, cascades with the customer)
//! - `address` - Customer addresses (owned, cascades with the customer)
//! - `category` - Menu categories
//! - `product` - Menu items
//! - `product_category` - Product/category links (many-to-many)
//!
//! # Storage ports
//!
//! Each aggregate is reached through an object-safe trait ([`CustomerStore`],
//! [`CategoryStore`], [`ProductStore`]) so services can run against
//! `PostgreSQL` in production and against in-memory stores in tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p sushi-cli -- migrate
//! ```

pub mod categories;
pub mod customers;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

pub use categories::{CategoryStore, PgCategoryStore};
pub use customers::{CustomerStore, PgCustomerStore};
pub use products::{PgProductStore, ProductStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into `Conflict`.
    pub(crate) fn from_write(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Isolation for reads that must agree with each other (page total and content).
const SNAPSHOT_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY";

/// Begin a read-only transaction in which every statement sees one snapshot.
pub(crate) async fn begin_snapshot(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(SNAPSHOT_ISOLATION).execute(&mut *tx).await?;
    Ok(tx)
}

/// Convert a SQL `COUNT(*)` into the unsigned total used by `Page`.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Escape `LIKE` wildcards so user input matches literally (`ESCAPE '\'`).
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
