//! Token payload.
//!
//! The payload is serialized straight into the JWT claims set:
//!
//! | Claim | Field |
//! |-------|-------|
//! | `jti` | [`Payload::id`] |
//! | `user_id` | [`Payload::user_id`] |
//! | `role` | [`Payload::role`] |
//! | `iat` | [`Payload::issued_at`] (Unix seconds) |
//! | `exp` | [`Payload::expires_at`] (Unix seconds) |

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity assertion binding a staff user id to a role for a bounded time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Payload {
    /// Unique token id
    #[serde(rename = "jti")]
    pub id: Uuid,
    /// Subject (staff user) id
    pub user_id: i64,
    /// Role name, e.g. `admin` or `staff`
    pub role: String,
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, format = DateTime)]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
}

impl Payload {
    /// Builds a payload issued now. Timestamps are truncated to whole
    /// seconds so that a verified payload compares equal to the issued one.
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn new(user_id: i64, role: &str, duration: Duration) -> Option<Self> {
        let now = Utc::now().trunc_subsecs(0);
        let expires_at = now.checked_add_signed(duration)?;

        Some(Self {
            id: Uuid::new_v4(),
            user_id,
            role: role.to_string(),
            issued_at: now,
            expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_standard_claim_names() {
        let payload = Payload::new(7, "staff", Duration::minutes(5)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["jti"], payload.id.to_string());
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["role"], "staff");
        assert_eq!(json["iat"], payload.issued_at.timestamp());
        assert_eq!(json["exp"], payload.expires_at.timestamp());
    }

    #[test]
    fn test_payload_deserialize() {
        let json = r#"{"jti":"6f1c1b62-5d0c-4e55-a0c4-3c3f4f1d2a10","user_id":12,"role":"admin","iat":1700000000,"exp":1700003600}"#;
        let payload: Payload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.user_id, 12);
        assert_eq!(payload.role, "admin");
        assert_eq!(payload.issued_at.timestamp(), 1_700_000_000);
        assert_eq!(payload.expires_at.timestamp(), 1_700_003_600);
        assert!(payload.is_expired());
    }

    #[test]
    fn test_new_payload_window() {
        let payload = Payload::new(1, "staff", Duration::hours(1)).unwrap();
        assert_eq!(payload.expires_at - payload.issued_at, Duration::hours(1));
        assert_eq!(payload.issued_at.timestamp_subsec_nanos(), 0);
        assert!(!payload.is_expired());
    }

    #[test]
    fn test_unrepresentable_expiry_is_none() {
        assert!(Payload::new(1, "staff", Duration::seconds(9_000_000_000_000)).is_none());
    }

    #[test]
    fn test_each_payload_gets_fresh_id() {
        let a = Payload::new(1, "staff", Duration::hours(1)).unwrap();
        let b = Payload::new(1, "staff", Duration::hours(1)).unwrap();
        assert_ne!(a.id, b.id);
    }
}
