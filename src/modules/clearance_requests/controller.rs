use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use clearance_core::AppError;
use clearance_models::{
    ClearanceRecord, ClearanceRequest, ClearanceRequestId, ClearanceRequestWithRecords, StudentId,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedPath;

use super::service::ClearanceRequestService;

#[utoipa::path(
    post,
    path = "/api/students/{id}/clearance_request",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 201, description = "Clearance request created with one pending record per item", body = ClearanceRequestWithRecords),
        (status = 400, description = "No active session or request already submitted", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Workflow creation failed", body = ErrorResponse)
    ),
    tag = "Clearance Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn submit_clearance_request(
    State(state): State<AppState>,
    ValidatedPath(student_id): ValidatedPath<StudentId>,
) -> Result<(StatusCode, Json<ClearanceRequestWithRecords>), AppError> {
    let submitted =
        ClearanceRequestService::submit_clearance_request(state.store.as_ref(), student_id).await?;

    Ok((StatusCode::CREATED, Json(submitted)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/clearance_requests",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Clearance requests of the student", body = [ClearanceRequest]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Clearance Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_student_clearance_requests(
    State(state): State<AppState>,
    ValidatedPath(student_id): ValidatedPath<StudentId>,
) -> Result<Json<Vec<ClearanceRequest>>, AppError> {
    let requests =
        ClearanceRequestService::list_requests_by_student(state.store.as_ref(), student_id).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/clearance_requests/{id}",
    params(("id" = i64, Path, description = "Clearance request ID")),
    responses(
        (status = 200, description = "Clearance request with its records", body = ClearanceRequestWithRecords),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Clearance request not found", body = ErrorResponse)
    ),
    tag = "Clearance Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_clearance_request(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClearanceRequestId>,
) -> Result<Json<ClearanceRequestWithRecords>, AppError> {
    let request = ClearanceRequestService::get_clearance_request(state.store.as_ref(), id).await?;
    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/api/clearance_requests/{id}/records",
    params(("id" = i64, Path, description = "Clearance request ID")),
    responses(
        (status = 200, description = "Records of the clearance request", body = [ClearanceRecord]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Clearance request not found", body = ErrorResponse)
    ),
    tag = "Clearance Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_clearance_request_records(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClearanceRequestId>,
) -> Result<Json<Vec<ClearanceRecord>>, AppError> {
    let records = ClearanceRequestService::list_records_by_request(state.store.as_ref(), id).await?;
    Ok(Json(records))
}
