//! Clearance request models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClearanceRequestId, SessionId, StudentId};
use crate::records::{ClearanceRecord, ClearanceStatus};

/// A student's request to be cleared within one session.
///
/// Unique per `(student_id, session_id)`. The stored `status` is set to
/// `pending` at creation and is not transitioned; the overall state is
/// derived from the records (see [`ClearanceRequestWithRecords`]).
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct ClearanceRequest {
    pub id: ClearanceRequestId,
    pub student_id: StudentId,
    pub session_id: SessionId,
    pub status: ClearanceStatus,
    pub created_at: DateTime<Utc>,
}

/// A request together with the records spawned for it.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ClearanceRequestWithRecords {
    pub request: ClearanceRequest,
    pub records: Vec<ClearanceRecord>,
    /// Aggregate of the record statuses
    pub overall_status: ClearanceStatus,
}

impl ClearanceRequestWithRecords {
    pub fn new(request: ClearanceRequest, records: Vec<ClearanceRecord>) -> Self {
        let overall_status = ClearanceStatus::aggregate(records.iter().map(|r| r.status));
        Self {
            request,
            records,
            overall_status,
        }
    }
}
