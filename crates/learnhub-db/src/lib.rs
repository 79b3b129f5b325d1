//! # LearnHub DB
//!
//! PostgreSQL pool initialization and the [`filters::Filters`] helper that list
//! endpoints use to assemble their `WHERE` clauses.
//!
//! ```ignore
//! let pool = learnhub_db::init_db_pool(&DatabaseConfig::from_env().unwrap()).await?;
//! sqlx::migrate!("./migrations").run(&pool).await?;
//! ```

pub mod filters;

use learnhub_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use filters::Filters;
// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a pool sized by `DB_MAX_CONNECTIONS`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}
