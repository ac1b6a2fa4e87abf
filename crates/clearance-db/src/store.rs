//! The persistence capability the workflow runs against.
//!
//! Services depend on `&dyn Store` only. [`PgStore`](crate::PgStore) is the
//! production implementation; `InMemoryStore` backs tests.

use async_trait::async_trait;
use clearance_core::AppError;
use clearance_models::{
    ClearanceItem, ClearanceItemId, ClearanceRecord, ClearanceRecordId, ClearanceRequest,
    ClearanceRequestId, ClearanceSession, Notification, NotificationId, Recipient,
    RecordStatusUpdate, SessionId, StaffCredentials, Student, StudentId,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A read-by-id found nothing. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid stored data: {0}")]
    InvalidData(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => {
                AppError::not_found(anyhow::anyhow!("{entity} not found"))
            }
            StoreError::UniqueViolation(_) => AppError::conflict(err),
            StoreError::Database(_) | StoreError::InvalidData(_) | StoreError::Unavailable(_) => {
                AppError::internal(err)
            }
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_student(&self, id: StudentId) -> Result<Student, StoreError>;

    /// The single active session, or `NotFound` when none is active.
    async fn get_active_session(&self) -> Result<ClearanceSession, StoreError>;

    async fn get_student_request_for_session(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<Option<ClearanceRequest>, StoreError>;

    /// All items, ordered by `(sequence, id)`.
    async fn list_clearance_items(&self) -> Result<Vec<ClearanceItem>, StoreError>;

    async fn get_clearance_item(&self, id: ClearanceItemId) -> Result<ClearanceItem, StoreError>;

    async fn get_clearance_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<ClearanceRequest, StoreError>;

    async fn list_requests_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRequest>, StoreError>;

    async fn get_clearance_record(
        &self,
        id: ClearanceRecordId,
    ) -> Result<ClearanceRecord, StoreError>;

    async fn list_records_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRecord>, StoreError>;

    async fn list_records_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ClearanceRecord>, StoreError>;

    /// Records sharing the request's student and session. `NotFound` if the
    /// request does not exist.
    async fn list_records_by_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<Vec<ClearanceRecord>, StoreError>;

    async fn update_clearance_record_status(
        &self,
        id: ClearanceRecordId,
        update: &RecordStatusUpdate,
    ) -> Result<ClearanceRecord, StoreError>;

    async fn create_notification(
        &self,
        recipient: Recipient,
        message: &str,
    ) -> Result<Notification, StoreError>;

    async fn get_notification(&self, id: NotificationId) -> Result<Notification, StoreError>;

    /// Newest first.
    async fn list_notifications(
        &self,
        recipient: Recipient,
    ) -> Result<Vec<Notification>, StoreError>;

    async fn mark_notification_read(&self, id: NotificationId)
    -> Result<Notification, StoreError>;

    async fn get_staff_user_by_username(
        &self,
        username: &str,
    ) -> Result<StaffCredentials, StoreError>;

    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;
}

/// A unit of work. Nothing written through it is visible until
/// [`StoreTx::commit`]; dropping it uncommitted rolls back.
#[async_trait]
pub trait StoreTx: Send {
    async fn create_clearance_request(
        &mut self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<ClearanceRequest, StoreError>;

    async fn list_clearance_items(&mut self) -> Result<Vec<ClearanceItem>, StoreError>;

    async fn create_clearance_record(
        &mut self,
        student_id: StudentId,
        item_id: ClearanceItemId,
        session_id: SessionId,
    ) -> Result<ClearanceRecord, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearance_core::ErrorKind;

    #[test]
    fn test_store_error_to_app_error() {
        let err: AppError = StoreError::NotFound("clearance record").into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message(), "clearance record not found");

        let err: AppError = StoreError::UniqueViolation("clearance_requests".into()).into();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err: AppError = StoreError::Unavailable("lock poisoned".into()).into();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
