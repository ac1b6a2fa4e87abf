use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use clearance_auth::JwtMaker;
use clearance_config::{CorsConfig, DatabaseConfig, JwtConfig};
use clearance_db::{PgStore, Store, init_db_pool, run_migrations};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_maker: JwtMaker,
    pub access_token_ttl: Duration,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Builds state around any store. Fails if the configured secret is too
    /// short to sign tokens with or the token lifetime is out of range.
    pub fn new(
        store: Arc<dyn Store>,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> anyhow::Result<Self> {
        let jwt_maker = JwtMaker::from_config(&jwt_config).context("invalid JWT configuration")?;
        let access_token_ttl = jwt_config
            .access_token_ttl()
            .context("invalid JWT configuration")?;

        Ok(Self {
            store,
            jwt_maker,
            access_token_ttl,
            cors_config,
        })
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&database_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    AppState::new(
        Arc::new(PgStore::new(pool)),
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    )
}
