//! Token minting and verification.
//!
//! [`JwtMaker`] signs [`Payload`]s with HMAC-SHA256 using a secret supplied at
//! construction. Verification accepts HS256 only: a token whose header names
//! any other algorithm (another HMAC width, an asymmetric scheme or `none`)
//! is rejected as [`TokenError::InvalidToken`] before its signature is even
//! considered.
//!
//! # Example
//!
//! ```ignore
//! let maker = JwtMaker::new("a-secret-that-is-at-least-32-bytes-long")?;
//! let (token, _payload) = maker.create_token(3, "staff", Duration::minutes(15))?;
//!
//! match maker.verify_token(&token) {
//!     Ok(payload) => println!("staff {} as {}", payload.user_id, payload.role),
//!     Err(TokenError::ExpiredToken) => println!("log in again"),
//!     Err(e) => println!("rejected: {}", e),
//! }
//! ```

use std::fmt;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use clearance_config::JwtConfig;

use crate::claims::Payload;

/// Minimum accepted signing secret length, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("secret key must be at least {MIN_SECRET_LEN} bytes")]
    SecretTooShort,
    #[error("token duration must be positive")]
    InvalidDuration,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Stateless HS256 token service.
#[derive(Clone)]
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtMaker")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl JwtMaker {
    /// Creates a maker from a raw secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SecretTooShort`] when the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::SecretTooShort);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        Self::new(&config.secret)
    }

    /// Mints a token for `user_id` acting as `role`, valid for `duration`.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidDuration`] if `duration` is zero or negative, or
    ///   pushes the expiry past the representable date range
    /// - [`TokenError::Signing`] if encoding fails
    pub fn create_token(
        &self,
        user_id: i64,
        role: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        if duration <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }

        let payload =
            Payload::new(user_id, role, duration).ok_or(TokenError::InvalidDuration)?;
        let token = self.sign(&payload)?;

        Ok((token, payload))
    }

    /// Verifies signature, algorithm and expiry, returning the payload.
    ///
    /// # Errors
    ///
    /// - [`TokenError::ExpiredToken`] when the current time is past `exp`
    /// - [`TokenError::InvalidToken`] for anything else: bad signature,
    ///   malformed structure, unexpected algorithm, missing claims
    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        decode::<Payload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken,
            })
    }

    fn sign(&self, payload: &Payload) -> Result<String, TokenError> {
        encode(&Header::new(ALGORITHM), payload, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn maker() -> JwtMaker {
        JwtMaker::new(SECRET).unwrap()
    }

    #[test]
    fn test_short_secret_fails_construction() {
        let result = JwtMaker::new("too-short");
        assert!(matches!(result, Err(TokenError::SecretTooShort)));

        let exactly_min = "x".repeat(MIN_SECRET_LEN);
        assert!(JwtMaker::new(&exactly_min).is_ok());
    }

    #[test]
    fn test_from_config_uses_secret() {
        let config = JwtConfig {
            secret: SECRET.to_string(),
            access_token_expiry: 3600,
        };
        let maker = JwtMaker::from_config(&config).unwrap();
        let (token, _) = maker.create_token(1, "staff", Duration::minutes(1)).unwrap();
        assert!(JwtMaker::new(SECRET).unwrap().verify_token(&token).is_ok());
    }

    #[test]
    fn test_create_and_verify_token() {
        let maker = maker();
        let (token, payload) = maker.create_token(42, "staff", Duration::hours(1)).unwrap();

        assert!(!token.is_empty());
        assert_eq!(payload.user_id, 42);
        assert_eq!(payload.role, "staff");

        let verified = maker.verify_token(&token).unwrap();
        assert_eq!(verified, payload);
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let maker = maker();
        assert_eq!(
            maker.create_token(1, "staff", Duration::zero()).unwrap_err(),
            TokenError::InvalidDuration
        );
        assert_eq!(
            maker.create_token(1, "staff", Duration::seconds(-5)).unwrap_err(),
            TokenError::InvalidDuration
        );
    }

    #[test]
    fn test_out_of_range_duration_rejected() {
        let maker = maker();
        assert_eq!(
            maker
                .create_token(1, "staff", Duration::seconds(9_000_000_000_000))
                .unwrap_err(),
            TokenError::InvalidDuration
        );
    }

    #[test]
    fn test_expired_token() {
        let maker = maker();
        let now = Utc::now();
        let payload = Payload {
            id: uuid::Uuid::new_v4(),
            user_id: 9,
            role: "staff".to_string(),
            issued_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
        };
        let token = maker.sign(&payload).unwrap();

        assert_eq!(maker.verify_token(&token).unwrap_err(), TokenError::ExpiredToken);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (token, _) = maker().create_token(1, "admin", Duration::hours(1)).unwrap();
        let other = JwtMaker::new("different-secret-key-at-least-32-characters").unwrap();

        assert_eq!(other.verify_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let maker = maker();
        assert_eq!(maker.verify_token("").unwrap_err(), TokenError::InvalidToken);
        assert_eq!(
            maker.verify_token("invalid.token.here").unwrap_err(),
            TokenError::InvalidToken
        );
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let maker = maker();
        let (token, _) = maker.create_token(5, "staff", Duration::hours(1)).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", head, flipped, &signature[1..]);

        assert_eq!(maker.verify_token(&tampered).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_swapped_payload_is_invalid() {
        let maker = maker();
        let (staff_token, _) = maker.create_token(5, "staff", Duration::hours(1)).unwrap();
        let (admin_token, _) = maker.create_token(5, "admin", Duration::hours(1)).unwrap();

        let staff_parts: Vec<&str> = staff_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", staff_parts[0], admin_parts[1], staff_parts[2]);

        assert_eq!(maker.verify_token(&forged).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_other_hmac_algorithm_is_invalid() {
        let maker = maker();
        let payload = Payload::new(5, "admin", Duration::hours(1)).unwrap();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(maker.verify_token(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_unsigned_token_is_invalid() {
        let maker = maker();
        let (token, _) = maker.create_token(5, "admin", Duration::hours(1)).unwrap();
        let claims = token.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", claims);

        assert_eq!(maker.verify_token(&unsigned).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let rendered = format!("{:?}", maker());
        assert!(!rendered.contains(SECRET));
    }
}
