mod common;

use clearance::modules::clearance_records::service::ClearanceRecordService;
use clearance::modules::clearance_requests::service::ClearanceRequestService;
use clearance::modules::notifications::service::NotificationService;
use clearance_core::ErrorKind;
use clearance_db::InMemoryStore;
use clearance_models::{
    ClearanceRecord, ClearanceRecordId, ClearanceRequestWithRecords, ClearanceStatus, Recipient,
    SessionId, StaffUserId, StudentId, UpdateClearanceRecordStatusDto,
};
use common::{SESSION_ID, STAFF_ID, STUDENT_ID, seeded_store};

async fn submitted(store: &InMemoryStore) -> ClearanceRequestWithRecords {
    ClearanceRequestService::submit_clearance_request(store, StudentId::new(STUDENT_ID))
        .await
        .unwrap()
}

fn dto(status: ClearanceStatus, note: Option<&str>) -> UpdateClearanceRecordStatusDto {
    UpdateClearanceRecordStatusDto {
        status,
        note: note.map(str::to_string),
        attachment_url: None,
    }
}

async fn update(
    store: &InMemoryStore,
    record: &ClearanceRecord,
    status: ClearanceStatus,
    note: Option<&str>,
) -> ClearanceRecord {
    ClearanceRecordService::update_clearance_record_status(
        store,
        record.id,
        StaffUserId::new(STAFF_ID),
        dto(status, note),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_approve_updates_only_the_target_record() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    let target = &submitted.records[0];

    let updated = update(&store, target, ClearanceStatus::Approved, None).await;

    assert_eq!(updated.id, target.id);
    assert_eq!(updated.status, ClearanceStatus::Approved);
    assert_eq!(updated.handled_by, Some(StaffUserId::new(STAFF_ID)));
    assert!(updated.handled_at.is_some());

    for sibling in &submitted.records[1..] {
        let stored = ClearanceRecordService::get_clearance_record(&store, sibling.id)
            .await
            .unwrap();
        assert_eq!(&stored, sibling, "sibling records are untouched");
    }

    let request = ClearanceRequestService::get_clearance_request(&store, submitted.request.id)
        .await
        .unwrap();
    assert_eq!(request.overall_status, ClearanceStatus::Pending);
}

#[tokio::test]
async fn test_approve_notifies_student_and_staff() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    let target = &submitted.records[0];

    update(&store, target, ClearanceStatus::Approved, None).await;

    let student_notifications =
        NotificationService::list_notifications(&store, Recipient::Student(StudentId::new(STUDENT_ID)))
            .await
            .unwrap();
    assert_eq!(student_notifications.len(), 1);
    assert_eq!(
        student_notifications[0].message,
        "Your clearance item 'A' has been approved."
    );
    assert!(!student_notifications[0].read);

    let staff_notifications =
        NotificationService::list_notifications(&store, Recipient::Staff(StaffUserId::new(STAFF_ID)))
            .await
            .unwrap();
    assert_eq!(staff_notifications.len(), 1);
    assert_eq!(
        staff_notifications[0].message,
        format!("You updated clearance record {} with status 'approved'.", target.id)
    );
}

#[tokio::test]
async fn test_reject_carries_note_into_notification() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    let target = &submitted.records[1];

    let updated = update(&store, target, ClearanceStatus::Rejected, Some("fees owed")).await;
    assert_eq!(updated.status, ClearanceStatus::Rejected);
    assert_eq!(updated.note.as_deref(), Some("fees owed"));

    let student_notifications =
        NotificationService::list_notifications(&store, Recipient::Student(StudentId::new(STUDENT_ID)))
            .await
            .unwrap();
    assert_eq!(
        student_notifications[0].message,
        "Your clearance item 'B' has been rejected. Note: fees owed"
    );

    let request = ClearanceRequestService::get_clearance_request(&store, submitted.request.id)
        .await
        .unwrap();
    assert_eq!(request.overall_status, ClearanceStatus::Rejected);
}

#[tokio::test]
async fn test_all_approved_request_is_approved() {
    let store = seeded_store();
    let submitted = submitted(&store).await;

    for record in &submitted.records {
        update(&store, record, ClearanceStatus::Approved, None).await;
    }

    let request = ClearanceRequestService::get_clearance_request(&store, submitted.request.id)
        .await
        .unwrap();
    assert_eq!(request.overall_status, ClearanceStatus::Approved);
}

#[tokio::test]
async fn test_decision_can_be_revised() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    let target = &submitted.records[0];

    update(&store, target, ClearanceStatus::Rejected, Some("missing book")).await;
    let revised = update(&store, target, ClearanceStatus::Approved, Some("returned")).await;

    assert_eq!(revised.status, ClearanceStatus::Approved);
    assert_eq!(revised.note.as_deref(), Some("returned"));
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_update() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    store.fail_notifications(true);

    let updated = update(&store, &submitted.records[2], ClearanceStatus::Approved, None).await;

    assert_eq!(updated.status, ClearanceStatus::Approved);
    assert!(store.notifications().is_empty());

    let stored = ClearanceRecordService::get_clearance_record(&store, updated.id)
        .await
        .unwrap();
    assert_eq!(stored.status, ClearanceStatus::Approved);
}

#[tokio::test]
async fn test_pending_is_not_a_target() {
    let store = seeded_store();
    let submitted = submitted(&store).await;
    let target = &submitted.records[0];

    let err = ClearanceRecordService::update_clearance_record_status(
        &store,
        target.id,
        StaffUserId::new(STAFF_ID),
        dto(ClearanceStatus::Pending, None),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.message(), "pending is not a valid target status");
    assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn test_unknown_record() {
    let store = seeded_store();

    let err = ClearanceRecordService::update_clearance_record_status(
        &store,
        ClearanceRecordId::new(9999),
        StaffUserId::new(STAFF_ID),
        dto(ClearanceStatus::Approved, None),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message(), "clearance record not found");
    assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn test_record_listings() {
    let store = seeded_store();
    let submitted = submitted(&store).await;

    let by_student =
        ClearanceRecordService::list_records_by_student(&store, StudentId::new(STUDENT_ID))
            .await
            .unwrap();
    assert_eq!(by_student.len(), submitted.records.len());

    let by_session =
        ClearanceRecordService::list_records_by_session(&store, SessionId::new(SESSION_ID))
            .await
            .unwrap();
    assert_eq!(by_session.len(), submitted.records.len());

    let none = ClearanceRecordService::list_records_by_session(&store, SessionId::new(999))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_mark_notification_read() {
    let store = seeded_store();
    let notification =
        NotificationService::send(&store, Recipient::Student(StudentId::new(STUDENT_ID)), "hello")
            .await
            .unwrap();
    assert!(!notification.read);

    let read = NotificationService::mark_notification_read(&store, notification.id)
        .await
        .unwrap();
    assert!(read.read);

    let again = NotificationService::mark_notification_read(&store, notification.id)
        .await
        .unwrap();
    assert!(again.read);
}
