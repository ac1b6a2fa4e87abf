//! Clearance session models.
//!
//! A clearance session is a bounded cycle during which students may submit
//! clearance requests. At most one session is active at a time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::SessionId;

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct ClearanceSession {
    pub id: SessionId,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
