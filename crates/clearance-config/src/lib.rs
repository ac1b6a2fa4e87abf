//! # Clearance Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: listen addresses for the API and the metrics endpoint
//!
//! # Example
//!
//! ```ignore
//! use clearance_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let database_config = DatabaseConfig::from_env()?;
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::{ConfigError, DatabaseConfig};
pub use jwt::JwtConfig;
pub use server::ServerConfig;
