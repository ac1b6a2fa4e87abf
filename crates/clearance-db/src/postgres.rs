//! PostgreSQL implementation of [`Store`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clearance_models::{
    ClearanceItem, ClearanceItemId, ClearanceRecord, ClearanceRecordId, ClearanceRequest,
    ClearanceRequestId, ClearanceSession, Notification, NotificationId, Recipient,
    RecordStatusUpdate, SessionId, StaffCredentials, StaffUserId, Student, StudentId,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::store::{Store, StoreError, StoreTx};

const STUDENT_COLUMNS: &str = "id, student_number, full_name, department_id, created_at";
const SESSION_COLUMNS: &str = "id, name, is_active, created_at";
const ITEM_COLUMNS: &str = "id, code, title, description, department_id, approver_staff_id, \
                            requires_attachment, sequence, created_at";
const REQUEST_COLUMNS: &str = "id, student_id, session_id, status, created_at";
const RECORD_COLUMNS: &str = "id, student_id, clearance_item_id, session_id, status, note, \
                              handled_by, attachment_url, handled_at, created_at";
const NOTIFICATION_COLUMNS: &str = "id, user_id, student_id, message, is_read, created_at";

#[derive(FromRow)]
struct NotificationRow {
    id: NotificationId,
    user_id: Option<StaffUserId>,
    student_id: Option<StudentId>,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let recipient = Recipient::from_columns(row.user_id, row.student_id).ok_or_else(|| {
            StoreError::InvalidData(format!("notification {} has no single recipient", row.id))
        })?;

        Ok(Notification {
            id: row.id,
            recipient,
            message: row.message,
            read: row.is_read,
            created_at: row.created_at,
        })
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation(
            db_err.constraint().unwrap_or("unknown").to_string(),
        );
    }
    StoreError::Database(e)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self))]
    async fn get_student(&self, id: StudentId) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("student"))
    }

    #[instrument(skip(self))]
    async fn get_active_session(&self) -> Result<ClearanceSession, StoreError> {
        sqlx::query_as::<_, ClearanceSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM clearance_sessions WHERE is_active LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("active clearance session"))
    }

    #[instrument(skip(self))]
    async fn get_student_request_for_session(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<Option<ClearanceRequest>, StoreError> {
        let request = sqlx::query_as::<_, ClearanceRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM clearance_requests
             WHERE student_id = $1 AND session_id = $2"
        ))
        .bind(student_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    #[instrument(skip(self))]
    async fn list_clearance_items(&self) -> Result<Vec<ClearanceItem>, StoreError> {
        let items = sqlx::query_as::<_, ClearanceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM clearance_items ORDER BY sequence, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    #[instrument(skip(self))]
    async fn get_clearance_item(&self, id: ClearanceItemId) -> Result<ClearanceItem, StoreError> {
        sqlx::query_as::<_, ClearanceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM clearance_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("clearance item"))
    }

    #[instrument(skip(self))]
    async fn get_clearance_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<ClearanceRequest, StoreError> {
        sqlx::query_as::<_, ClearanceRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM clearance_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("clearance request"))
    }

    #[instrument(skip(self))]
    async fn list_requests_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRequest>, StoreError> {
        let requests = sqlx::query_as::<_, ClearanceRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM clearance_requests WHERE student_id = $1 ORDER BY id"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    #[instrument(skip(self))]
    async fn get_clearance_record(
        &self,
        id: ClearanceRecordId,
    ) -> Result<ClearanceRecord, StoreError> {
        sqlx::query_as::<_, ClearanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM clearance_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("clearance record"))
    }

    #[instrument(skip(self))]
    async fn list_records_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let records = sqlx::query_as::<_, ClearanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM clearance_records WHERE student_id = $1 ORDER BY id"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[instrument(skip(self))]
    async fn list_records_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let records = sqlx::query_as::<_, ClearanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM clearance_records WHERE session_id = $1 ORDER BY id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[instrument(skip(self))]
    async fn list_records_by_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let request = self.get_clearance_request(id).await?;

        let records = sqlx::query_as::<_, ClearanceRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM clearance_records
             WHERE student_id = $1 AND session_id = $2
             ORDER BY id"
        ))
        .bind(request.student_id)
        .bind(request.session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[instrument(skip(self, update), fields(status = %update.status))]
    async fn update_clearance_record_status(
        &self,
        id: ClearanceRecordId,
        update: &RecordStatusUpdate,
    ) -> Result<ClearanceRecord, StoreError> {
        sqlx::query_as::<_, ClearanceRecord>(&format!(
            "UPDATE clearance_records
             SET status = $2, note = $3, handled_by = $4, handled_at = $5, attachment_url = $6
             WHERE id = $1
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(id)
        .bind(update.status)
        .bind(&update.note)
        .bind(update.handled_by)
        .bind(update.handled_at)
        .bind(&update.attachment_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("clearance record"))
    }

    #[instrument(skip(self, message))]
    async fn create_notification(
        &self,
        recipient: Recipient,
        message: &str,
    ) -> Result<Notification, StoreError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications (user_id, student_id, message)
             VALUES ($1, $2, $3)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(recipient.staff_id())
        .bind(recipient.student_id())
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn get_notification(&self, id: NotificationId) -> Result<Notification, StoreError> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("notification"))?
        .try_into()
    }

    #[instrument(skip(self))]
    async fn list_notifications(
        &self,
        recipient: Recipient,
    ) -> Result<Vec<Notification>, StoreError> {
        let query = match recipient {
            Recipient::Staff(_) => format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
            ),
            Recipient::Student(_) => format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE student_id = $1 ORDER BY created_at DESC, id DESC"
            ),
        };
        let id = match recipient {
            Recipient::Staff(id) => id.get(),
            Recipient::Student(id) => id.get(),
        };

        let rows = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Notification, StoreError> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("notification"))?
        .try_into()
    }

    #[instrument(skip(self))]
    async fn get_staff_user_by_username(
        &self,
        username: &str,
    ) -> Result<StaffCredentials, StoreError> {
        sqlx::query_as::<_, StaffCredentials>(
            r#"SELECT u.id, u.username, u.full_name, u.role_id, u.created_at,
                      r.name AS role, u.password_hash
               FROM staff_users u
               JOIN roles r ON r.id = u.role_id
               WHERE u.username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("staff user"))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTx { tx }))
    }
}

/// Wraps a sqlx transaction, which rolls back when dropped uncommitted.
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn create_clearance_request(
        &mut self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<ClearanceRequest, StoreError> {
        sqlx::query_as::<_, ClearanceRequest>(&format!(
            "INSERT INTO clearance_requests (student_id, session_id, status)
             VALUES ($1, $2, 'pending')
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(student_id)
        .bind(session_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_insert_error)
    }

    async fn list_clearance_items(&mut self) -> Result<Vec<ClearanceItem>, StoreError> {
        let items = sqlx::query_as::<_, ClearanceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM clearance_items ORDER BY sequence, id"
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(items)
    }

    async fn create_clearance_record(
        &mut self,
        student_id: StudentId,
        item_id: ClearanceItemId,
        session_id: SessionId,
    ) -> Result<ClearanceRecord, StoreError> {
        sqlx::query_as::<_, ClearanceRecord>(&format!(
            "INSERT INTO clearance_records (student_id, clearance_item_id, session_id, status)
             VALUES ($1, $2, $3, 'pending')
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(student_id)
        .bind(item_id)
        .bind(session_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_insert_error)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(map_insert_error)
    }
}
