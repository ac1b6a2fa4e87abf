use anyhow::anyhow;
use tracing::{error, info, instrument};

use clearance_core::AppError;
use clearance_db::{Store, StoreError};
use clearance_models::{
    ClearanceRecord, ClearanceRequest, ClearanceRequestId, ClearanceRequestWithRecords, SessionId,
    StudentId,
};

use crate::metrics::track_clearance_request_submitted;

pub struct ClearanceRequestService;

impl ClearanceRequestService {
    /// Opens a clearance request for the student in the active session and
    /// creates one pending record per clearance item, all in one transaction.
    #[instrument(skip(store))]
    pub async fn submit_clearance_request(
        store: &dyn Store,
        student_id: StudentId,
    ) -> Result<ClearanceRequestWithRecords, AppError> {
        let student = store
            .get_student(student_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => AppError::not_found(anyhow!("student not found")),
                e => AppError::from(e),
            })?;

        let session = store.get_active_session().await.map_err(|e| match e {
            StoreError::NotFound(_) => {
                AppError::invalid_state(anyhow!("no active clearance session"))
            }
            e => AppError::from(e),
        })?;

        if store
            .get_student_request_for_session(student.id, session.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(anyhow!(
                "clearance request already submitted"
            )));
        }

        let (request, records) = Self::create_workflow(store, student.id, session.id)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    return AppError::conflict(anyhow!("clearance request already submitted"));
                }
                error!(error = %e, student_id = %student.id, session_id = %session.id, "Clearance workflow rolled back");
                AppError::internal(anyhow!("failed to create clearance workflow"))
            })?;

        track_clearance_request_submitted(records.len());
        info!(
            request_id = %request.id,
            student_id = %student.id,
            session_id = %session.id,
            records = records.len(),
            "Clearance request submitted"
        );

        Ok(ClearanceRequestWithRecords::new(request, records))
    }

    /// Request row plus one record per item, committed together. Any early
    /// return drops the transaction, which rolls it back.
    async fn create_workflow(
        store: &dyn Store,
        student_id: StudentId,
        session_id: SessionId,
    ) -> Result<(ClearanceRequest, Vec<ClearanceRecord>), StoreError> {
        let mut tx = store.begin().await?;

        let request = tx.create_clearance_request(student_id, session_id).await?;
        let items = tx.list_clearance_items().await?;

        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            let record = tx
                .create_clearance_record(student_id, item.id, session_id)
                .await?;
            records.push(record);
        }

        tx.commit().await?;

        Ok((request, records))
    }

    #[instrument(skip(store))]
    pub async fn get_clearance_request(
        store: &dyn Store,
        id: ClearanceRequestId,
    ) -> Result<ClearanceRequestWithRecords, AppError> {
        let request = store.get_clearance_request(id).await?;
        let records = store.list_records_by_request(id).await?;

        Ok(ClearanceRequestWithRecords::new(request, records))
    }

    #[instrument(skip(store))]
    pub async fn list_requests_by_student(
        store: &dyn Store,
        student_id: StudentId,
    ) -> Result<Vec<ClearanceRequest>, AppError> {
        let student = store.get_student(student_id).await?;
        let requests = store.list_requests_by_student(student.id).await?;
        Ok(requests)
    }

    #[instrument(skip(store))]
    pub async fn list_records_by_request(
        store: &dyn Store,
        id: ClearanceRequestId,
    ) -> Result<Vec<ClearanceRecord>, AppError> {
        let records = store.list_records_by_request(id).await?;
        Ok(records)
    }
}
