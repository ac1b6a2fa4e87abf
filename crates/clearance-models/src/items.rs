//! Clearance checklist items.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClearanceItemId, DepartmentId, StaffUserId};

/// A single checklist requirement owned by a department.
///
/// Items are listed ordered by `(sequence, id)`; submitting a clearance
/// request creates one record per item in that order.
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct ClearanceItem {
    pub id: ClearanceItemId,
    pub code: String,
    pub title: String,
    pub description: String,
    pub department_id: DepartmentId,
    /// Staff member designated to approve this item
    pub approver_staff_id: StaffUserId,
    pub requires_attachment: bool,
    pub sequence: i32,
    pub created_at: DateTime<Utc>,
}
