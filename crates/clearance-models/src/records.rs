//! Clearance records and the per-record approval state.
//!
//! A record tracks one student against one clearance item within one
//! session. Records start `pending` and move to `approved` or `rejected`
//! through a staff action; `pending` is never a valid transition target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClearanceItemId, ClearanceRecordId, SessionId, StaffUserId, StudentId};

/// Approval state shared by records and requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "clearance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClearanceStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClearanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClearanceStatus::Pending => "pending",
            ClearanceStatus::Approved => "approved",
            ClearanceStatus::Rejected => "rejected",
        }
    }

    /// Whether a staff member may move a record into this state.
    pub fn is_transition_target(self) -> bool {
        !matches!(self, ClearanceStatus::Pending)
    }

    /// Overall state of a set of records: rejected if any record is
    /// rejected, approved once every record is approved, pending otherwise.
    pub fn aggregate<I>(statuses: I) -> ClearanceStatus
    where
        I: IntoIterator<Item = ClearanceStatus>,
    {
        let mut all_approved = true;
        for status in statuses {
            match status {
                ClearanceStatus::Rejected => return ClearanceStatus::Rejected,
                ClearanceStatus::Pending => all_approved = false,
                ClearanceStatus::Approved => {}
            }
        }

        if all_approved {
            ClearanceStatus::Approved
        } else {
            ClearanceStatus::Pending
        }
    }
}

impl fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct ClearanceRecord {
    pub id: ClearanceRecordId,
    pub student_id: StudentId,
    pub clearance_item_id: ClearanceItemId,
    pub session_id: SessionId,
    pub status: ClearanceStatus,
    pub note: Option<String>,
    /// Staff member who last acted on the record
    pub handled_by: Option<StaffUserId>,
    pub attachment_url: Option<String>,
    pub handled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body of `PATCH /api/clearance_records/{id}/status`.
#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct UpdateClearanceRecordStatusDto {
    pub status: ClearanceStatus,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    #[validate(url)]
    pub attachment_url: Option<String>,
}

/// Fields written by a status transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStatusUpdate {
    pub status: ClearanceStatus,
    pub note: Option<String>,
    pub handled_by: StaffUserId,
    pub handled_at: DateTime<Utc>,
    pub attachment_url: Option<String>,
}
