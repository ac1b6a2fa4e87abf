//! # Clearance Auth
//!
//! Signed, time-limited identity assertions for the Clearance API.
//!
//! - [`claims`]: the [`Payload`] carried inside every token
//! - [`jwt`]: [`JwtMaker`], which mints and verifies HS256 tokens
//!
//! Tokens cannot be revoked or refreshed: once issued, a token is valid until
//! its `exp` claim passes.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Duration;
//! use clearance_auth::JwtMaker;
//! use clearance_config::JwtConfig;
//!
//! let maker = JwtMaker::from_config(&JwtConfig::from_env())?;
//! let (token, payload) = maker.create_token(7, "staff", Duration::hours(1))?;
//!
//! let verified = maker.verify_token(&token)?;
//! assert_eq!(verified, payload);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Payload;
pub use jwt::{JwtMaker, MIN_SECRET_LEN, TokenError};
