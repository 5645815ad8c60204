//! CLI command implementations.

pub mod migrate;
pub mod seed;

use sqlx::PgPool;

use sushi_api::config::ApiConfig;

/// Connect using the same configuration as the API server.
pub(crate) async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;
    let pool = sushi_api::db::create_pool(&config.database_url, 2).await?;
    Ok(pool)
}
