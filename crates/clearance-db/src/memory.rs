//! In-memory [`Store`] for tests and local development.
//!
//! Writes made through a [`StoreTx`] are staged and applied under a single
//! write lock on commit. The request uniqueness rule is re-checked at
//! commit time, mirroring the storage constraint.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use clearance_models::{
    ClearanceItem, ClearanceItemId, ClearanceRecord, ClearanceRecordId, ClearanceRequest,
    ClearanceRequestId, ClearanceSession, ClearanceStatus, Notification, NotificationId,
    Recipient, RecordStatusUpdate, SessionId, StaffCredentials, StaffUser, StaffUserId, Student,
    StudentId,
};

use crate::store::{Store, StoreError, StoreTx};

#[derive(Debug, Default)]
struct State {
    students: BTreeMap<StudentId, Student>,
    sessions: BTreeMap<SessionId, ClearanceSession>,
    items: BTreeMap<ClearanceItemId, ClearanceItem>,
    staff: BTreeMap<StaffUserId, StaffCredentials>,
    requests: BTreeMap<ClearanceRequestId, ClearanceRequest>,
    records: BTreeMap<ClearanceRecordId, ClearanceRecord>,
    notifications: BTreeMap<NotificationId, Notification>,
}

impl State {
    fn has_request(&self, student_id: StudentId, session_id: SessionId) -> bool {
        self.requests
            .values()
            .any(|r| r.student_id == student_id && r.session_id == session_id)
    }

    fn sorted_items(&self) -> Vec<ClearanceItem> {
        let mut items: Vec<ClearanceItem> = self.items.values().cloned().collect();
        items.sort_by_key(|i| (i.sequence, i.id));
        items
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: RwLock<State>,
    next_id: AtomicI64,
    fail_notifications: AtomicBool,
    /// 1-based index of the record insert (within one transaction) that
    /// fails; 0 disables the failure.
    fail_record_insert_at: AtomicUsize,
    stale_request_lookups: AtomicBool,
}

impl Inner {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

/// Intended for tests/dev. Seed reference data with the `insert_*` helpers;
/// generated ids start at 1000 so they never collide with seeded ones.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let inner = Inner {
            next_id: AtomicI64::new(999),
            ..Inner::default()
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn insert_student(&self, student: Student) {
        if let Ok(mut state) = self.inner.write() {
            state.students.insert(student.id, student);
        }
    }

    pub fn insert_session(&self, session: ClearanceSession) {
        if let Ok(mut state) = self.inner.write() {
            state.sessions.insert(session.id, session);
        }
    }

    pub fn insert_item(&self, item: ClearanceItem) {
        if let Ok(mut state) = self.inner.write() {
            state.items.insert(item.id, item);
        }
    }

    pub fn insert_staff_user(&self, user: StaffUser, role: &str, password_hash: String) {
        if let Ok(mut state) = self.inner.write() {
            state.staff.insert(
                user.id,
                StaffCredentials {
                    user,
                    role: role.to_string(),
                    password_hash,
                },
            );
        }
    }

    /// Makes every subsequent `create_notification` fail.
    pub fn fail_notifications(&self, fail: bool) {
        self.inner.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Makes the `n`th record insert of each transaction fail (1-based).
    /// `0` turns the failure off.
    pub fn fail_record_insert_at(&self, n: usize) {
        self.inner.fail_record_insert_at.store(n, Ordering::SeqCst);
    }

    /// Makes `get_student_request_for_session` report no request, as a read
    /// racing a concurrent submission would. Only the commit-time
    /// uniqueness check then guards against duplicates.
    pub fn stale_request_lookups(&self, stale: bool) {
        self.inner.stale_request_lookups.store(stale, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ClearanceRequest> {
        self.inner
            .read()
            .map(|s| s.requests.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn records(&self) -> Vec<ClearanceRecord> {
        self.inner
            .read()
            .map(|s| s.records.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .read()
            .map(|s| s.notifications.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_student(&self, id: StudentId) -> Result<Student, StoreError> {
        let state = self.inner.read()?;
        state
            .students
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("student"))
    }

    async fn get_active_session(&self) -> Result<ClearanceSession, StoreError> {
        let state = self.inner.read()?;
        state
            .sessions
            .values()
            .find(|s| s.is_active)
            .cloned()
            .ok_or(StoreError::NotFound("active clearance session"))
    }

    async fn get_student_request_for_session(
        &self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<Option<ClearanceRequest>, StoreError> {
        if self.inner.stale_request_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let state = self.inner.read()?;
        Ok(state
            .requests
            .values()
            .find(|r| r.student_id == student_id && r.session_id == session_id)
            .cloned())
    }

    async fn list_clearance_items(&self) -> Result<Vec<ClearanceItem>, StoreError> {
        Ok(self.inner.read()?.sorted_items())
    }

    async fn get_clearance_item(&self, id: ClearanceItemId) -> Result<ClearanceItem, StoreError> {
        let state = self.inner.read()?;
        state
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("clearance item"))
    }

    async fn get_clearance_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<ClearanceRequest, StoreError> {
        let state = self.inner.read()?;
        state
            .requests
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("clearance request"))
    }

    async fn list_requests_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRequest>, StoreError> {
        let state = self.inner.read()?;
        Ok(state
            .requests
            .values()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn get_clearance_record(
        &self,
        id: ClearanceRecordId,
    ) -> Result<ClearanceRecord, StoreError> {
        let state = self.inner.read()?;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("clearance record"))
    }

    async fn list_records_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let state = self.inner.read()?;
        Ok(state
            .records
            .values()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_records_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let state = self.inner.read()?;
        Ok(state
            .records
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn list_records_by_request(
        &self,
        id: ClearanceRequestId,
    ) -> Result<Vec<ClearanceRecord>, StoreError> {
        let state = self.inner.read()?;
        let request = state
            .requests
            .get(&id)
            .ok_or(StoreError::NotFound("clearance request"))?;

        Ok(state
            .records
            .values()
            .filter(|r| r.student_id == request.student_id && r.session_id == request.session_id)
            .cloned()
            .collect())
    }

    async fn update_clearance_record_status(
        &self,
        id: ClearanceRecordId,
        update: &RecordStatusUpdate,
    ) -> Result<ClearanceRecord, StoreError> {
        let mut state = self.inner.write()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound("clearance record"))?;

        record.status = update.status;
        record.note = update.note.clone();
        record.handled_by = Some(update.handled_by);
        record.handled_at = Some(update.handled_at);
        record.attachment_url = update.attachment_url.clone();

        Ok(record.clone())
    }

    async fn create_notification(
        &self,
        recipient: Recipient,
        message: &str,
    ) -> Result<Notification, StoreError> {
        if self.inner.fail_notifications.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "notification storage offline".to_string(),
            ));
        }

        let notification = Notification {
            id: NotificationId::new(self.inner.next_id()),
            recipient,
            message: message.to_string(),
            read: false,
            created_at: Utc::now(),
        };

        let mut state = self.inner.write()?;
        state
            .notifications
            .insert(notification.id, notification.clone());

        Ok(notification)
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Notification, StoreError> {
        let state = self.inner.read()?;
        state
            .notifications
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("notification"))
    }

    async fn list_notifications(
        &self,
        recipient: Recipient,
    ) -> Result<Vec<Notification>, StoreError> {
        let state = self.inner.read()?;
        Ok(state
            .notifications
            .values()
            .rev()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
    ) -> Result<Notification, StoreError> {
        let mut state = self.inner.write()?;
        let notification = state
            .notifications
            .get_mut(&id)
            .ok_or(StoreError::NotFound("notification"))?;
        notification.read = true;

        Ok(notification.clone())
    }

    async fn get_staff_user_by_username(
        &self,
        username: &str,
    ) -> Result<StaffCredentials, StoreError> {
        let state = self.inner.read()?;
        state
            .staff
            .values()
            .find(|c| c.user.username == username)
            .cloned()
            .ok_or(StoreError::NotFound("staff user"))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        Ok(Box::new(InMemoryTx {
            inner: Arc::clone(&self.inner),
            requests: Vec::new(),
            records: Vec::new(),
        }))
    }
}

/// Staged writes of one transaction. Dropping it discards them.
struct InMemoryTx {
    inner: Arc<Inner>,
    requests: Vec<ClearanceRequest>,
    records: Vec<ClearanceRecord>,
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn create_clearance_request(
        &mut self,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<ClearanceRequest, StoreError> {
        let staged = self
            .requests
            .iter()
            .any(|r| r.student_id == student_id && r.session_id == session_id);
        if staged || self.inner.read()?.has_request(student_id, session_id) {
            return Err(StoreError::UniqueViolation(
                "clearance_requests_student_id_session_id_key".to_string(),
            ));
        }

        let request = ClearanceRequest {
            id: ClearanceRequestId::new(self.inner.next_id()),
            student_id,
            session_id,
            status: ClearanceStatus::Pending,
            created_at: Utc::now(),
        };
        self.requests.push(request.clone());

        Ok(request)
    }

    async fn list_clearance_items(&mut self) -> Result<Vec<ClearanceItem>, StoreError> {
        Ok(self.inner.read()?.sorted_items())
    }

    async fn create_clearance_record(
        &mut self,
        student_id: StudentId,
        item_id: ClearanceItemId,
        session_id: SessionId,
    ) -> Result<ClearanceRecord, StoreError> {
        let fail_at = self.inner.fail_record_insert_at.load(Ordering::SeqCst);
        if fail_at != 0 && self.records.len() + 1 == fail_at {
            return Err(StoreError::Unavailable("record insert failed".to_string()));
        }

        let record = ClearanceRecord {
            id: ClearanceRecordId::new(self.inner.next_id()),
            student_id,
            clearance_item_id: item_id,
            session_id,
            status: ClearanceStatus::Pending,
            note: None,
            handled_by: None,
            attachment_url: None,
            handled_at: None,
            created_at: Utc::now(),
        };
        self.records.push(record.clone());

        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let mut state = this.inner.write()?;

        for request in &this.requests {
            if state.has_request(request.student_id, request.session_id) {
                return Err(StoreError::UniqueViolation(
                    "clearance_requests_student_id_session_id_key".to_string(),
                ));
            }
        }

        for request in this.requests {
            state.requests.insert(request.id, request);
        }
        for record in this.records {
            state.records.insert(record.id, record);
        }

        Ok(())
    }
}
