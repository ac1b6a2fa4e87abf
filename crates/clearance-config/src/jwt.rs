use std::env;

use chrono::{Duration, Utc};

use crate::database::ConfigError;

const DEV_SECRET: &str = "clearance-dev-secret-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, falling back to the development secret");
            DEV_SECRET.to_string()
        });

        Self {
            secret,
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        }
    }

    /// Access token lifetime as a duration. Must be positive and keep a
    /// token issued now within the representable date range.
    pub fn access_token_ttl(&self) -> Result<Duration, ConfigError> {
        Duration::try_seconds(self.access_token_expiry)
            .filter(|ttl| *ttl > Duration::zero())
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(ConfigError::OutOfRange(
                "JWT_ACCESS_EXPIRY",
                self.access_token_expiry,
            ))
    }
}
