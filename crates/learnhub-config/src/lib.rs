//! # LearnHub Config
//!
//! Configuration structures loaded from environment variables. Every value has a
//! development default except `DATABASE_URL`.
//!
//! - [`database`]: connection string and pool size
//! - [`jwt`]: token secret and lifetimes
//! - [`email`]: SMTP settings
//! - [`rate_limit`]: per-IP request limits
//! - [`server`]: bind address, CORS origins, cookie flags

pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
