//! Postgres connection pool.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::instrument;

use crate::config::DatabaseConfig;

#[instrument(skip(config), fields(max_connections = config.max_connections), err)]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .connect(&config.url)
        .await?;
    tracing::info!("postgres pool ready");
    Ok(pool)
}
