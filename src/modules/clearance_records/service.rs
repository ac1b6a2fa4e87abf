use anyhow::anyhow;
use chrono::Utc;
use tracing::{error, info, instrument};

use clearance_core::AppError;
use clearance_db::Store;
use clearance_models::{
    ClearanceRecord, ClearanceRecordId, ClearanceStatus, Recipient, RecordStatusUpdate,
    SessionId, StaffUserId, StudentId, UpdateClearanceRecordStatusDto,
};

use crate::metrics::track_clearance_record_updated;
use crate::modules::notifications::NotificationService;

/// Message sent to the student when one of their items is decided.
pub fn student_notification_message(
    item_title: &str,
    status: ClearanceStatus,
    note: Option<&str>,
) -> Option<String> {
    match status {
        ClearanceStatus::Approved => Some(format!(
            "Your clearance item '{item_title}' has been approved."
        )),
        ClearanceStatus::Rejected => Some(format!(
            "Your clearance item '{item_title}' has been rejected. Note: {}",
            note.unwrap_or_default()
        )),
        ClearanceStatus::Pending => None,
    }
}

/// Confirmation sent to the staff member who acted on a record.
pub fn staff_confirmation_message(record_id: ClearanceRecordId, status: ClearanceStatus) -> String {
    format!("You updated clearance record {record_id} with status '{status}'.")
}

pub struct ClearanceRecordService;

impl ClearanceRecordService {
    /// Moves a record to `approved` or `rejected` on behalf of `handled_by`,
    /// then notifies the student and the acting staff member. Notification
    /// failures never fail the update.
    #[instrument(skip(store, dto), fields(status = %dto.status))]
    pub async fn update_clearance_record_status(
        store: &dyn Store,
        record_id: ClearanceRecordId,
        handled_by: StaffUserId,
        dto: UpdateClearanceRecordStatusDto,
    ) -> Result<ClearanceRecord, AppError> {
        if !dto.status.is_transition_target() {
            return Err(AppError::bad_request(anyhow!(
                "pending is not a valid target status"
            )));
        }

        let update = RecordStatusUpdate {
            status: dto.status,
            note: dto.note,
            handled_by,
            handled_at: Utc::now(),
            attachment_url: dto.attachment_url,
        };

        let record = store
            .update_clearance_record_status(record_id, &update)
            .await?;

        let item = store
            .get_clearance_item(record.clearance_item_id)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %record.clearance_item_id, "Failed to load clearance item");
                AppError::internal(anyhow!("failed to load clearance item"))
            })?;

        track_clearance_record_updated(record.status);
        info!(
            record_id = %record.id,
            student_id = %record.student_id,
            handled_by = %handled_by,
            "Clearance record updated"
        );

        if let Some(message) =
            student_notification_message(&item.title, record.status, record.note.as_deref())
        {
            NotificationService::send_best_effort(
                store,
                Recipient::Student(record.student_id),
                &message,
            )
            .await;
        }

        NotificationService::send_best_effort(
            store,
            Recipient::Staff(handled_by),
            &staff_confirmation_message(record.id, record.status),
        )
        .await;

        Ok(record)
    }

    #[instrument(skip(store))]
    pub async fn get_clearance_record(
        store: &dyn Store,
        id: ClearanceRecordId,
    ) -> Result<ClearanceRecord, AppError> {
        let record = store.get_clearance_record(id).await?;
        Ok(record)
    }

    #[instrument(skip(store))]
    pub async fn list_records_by_student(
        store: &dyn Store,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRecord>, AppError> {
        let student = store.get_student(student_id).await?;
        let records = store.list_records_by_student(student.id).await?;
        Ok(records)
    }

    #[instrument(skip(store))]
    pub async fn list_records_by_session(
        store: &dyn Store,
        session_id: SessionId,
    ) -> Result<Vec<ClearanceRecord>, AppError> {
        let records = store.list_records_by_session(session_id).await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_messages() {
        assert_eq!(
            student_notification_message("Library", ClearanceStatus::Approved, Some("ok")).unwrap(),
            "Your clearance item 'Library' has been approved."
        );
        assert_eq!(
            student_notification_message("Bursary", ClearanceStatus::Rejected, Some("fees owed"))
                .unwrap(),
            "Your clearance item 'Bursary' has been rejected. Note: fees owed"
        );
        assert_eq!(
            student_notification_message("Bursary", ClearanceStatus::Rejected, None).unwrap(),
            "Your clearance item 'Bursary' has been rejected. Note: "
        );
        assert!(student_notification_message("Library", ClearanceStatus::Pending, None).is_none());
    }

    #[test]
    fn test_staff_confirmation_message() {
        assert_eq!(
            staff_confirmation_message(ClearanceRecordId::new(15), ClearanceStatus::Rejected),
            "You updated clearance record 15 with status 'rejected'."
        );
    }
}
