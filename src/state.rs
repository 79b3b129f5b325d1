use sqlx::PgPool;

use learnhub_config::{DatabaseConfig, EmailConfig, JwtConfig, RateLimitConfig, ServerConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub server_config: ServerConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppState {
    /// Builds state from the environment around an existing pool.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            email_config: EmailConfig::from_env(),
            server_config: ServerConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db_config = DatabaseConfig::from_env()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = learnhub_db::init_db_pool(&db_config).await?;

    Ok(AppState::from_env(db))
}
