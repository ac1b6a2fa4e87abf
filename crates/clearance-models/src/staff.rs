//! Staff user models and role names.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

use crate::ids::{RoleId, StaffUserId};

/// Role names carried in the `role` token claim.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const STAFF: &str = "staff";

    /// Roles allowed to drive the clearance workflow.
    pub const STAFF_ROLES: &[&str] = &[ADMIN, STAFF];
    pub const ADMIN_ROLES: &[&str] = &[ADMIN];
}

/// A staff account (approver, registrar, administrator).
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct StaffUser {
    pub id: StaffUserId,
    pub username: String,
    pub full_name: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
}

/// A staff user joined with its role name and password hash, for login.
#[derive(FromRow, Clone)]
pub struct StaffCredentials {
    #[sqlx(flatten)]
    pub user: StaffUser,
    pub role: String,
    pub password_hash: String,
}

impl fmt::Debug for StaffCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffCredentials")
            .field("user", &self.user)
            .field("role", &self.role)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
