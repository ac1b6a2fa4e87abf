//! # Clearance DB
//!
//! Persistence for the Clearance API.
//!
//! The workflow talks to storage through the [`Store`] capability. This crate
//! provides:
//!
//! - [`PgStore`]: PostgreSQL via SQLx, with real transactions
//! - `InMemoryStore` (feature `test-utils`): staged writes behind a lock
//! - [`init_db_pool`] / [`run_migrations`] for application startup
//!
//! # Example
//!
//! ```ignore
//! use clearance_config::DatabaseConfig;
//! use clearance_db::{PgStore, init_db_pool};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod postgres;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use clearance_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreError, StoreTx};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool sized by `DATABASE_MAX_CONNECTIONS`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );

    Ok(pool)
}

/// Applies the embedded migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
