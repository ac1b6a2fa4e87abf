use axum::{Json, extract::State};
use tracing::instrument;

use clearance_core::AppError;
use clearance_models::{
    ClearanceRecord, ClearanceRecordId, SessionId, StudentId, UpdateClearanceRecordStatusDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

use super::service::ClearanceRecordService;

#[utoipa::path(
    patch,
    path = "/api/clearance_records/{id}/status",
    params(("id" = i64, Path, description = "Clearance record ID")),
    request_body = UpdateClearanceRecordStatusDto,
    responses(
        (status = 200, description = "Record updated", body = ClearanceRecord),
        (status = 400, description = "Invalid target status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Clearance record not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Clearance Records",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(staff_id = %auth_user.staff_id()))]
pub async fn update_clearance_record_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<ClearanceRecordId>,
    ValidatedJson(dto): ValidatedJson<UpdateClearanceRecordStatusDto>,
) -> Result<Json<ClearanceRecord>, AppError> {
    let record = ClearanceRecordService::update_clearance_record_status(
        state.store.as_ref(),
        id,
        auth_user.staff_id(),
        dto,
    )
    .await?;

    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/clearance_records/{id}",
    params(("id" = i64, Path, description = "Clearance record ID")),
    responses(
        (status = 200, description = "Clearance record", body = ClearanceRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Clearance record not found", body = ErrorResponse)
    ),
    tag = "Clearance Records",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_clearance_record(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClearanceRecordId>,
) -> Result<Json<ClearanceRecord>, AppError> {
    let record = ClearanceRecordService::get_clearance_record(state.store.as_ref(), id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/records",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Records of the student across sessions", body = [ClearanceRecord]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires a staff role", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Clearance Records",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_student_records(
    State(state): State<AppState>,
    ValidatedPath(student_id): ValidatedPath<StudentId>,
) -> Result<Json<Vec<ClearanceRecord>>, AppError> {
    let records =
        ClearanceRecordService::list_records_by_student(state.store.as_ref(), student_id).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/records",
    params(("id" = i64, Path, description = "Clearance session ID")),
    responses(
        (status = 200, description = "All records of the session", body = [ClearanceRecord]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires the admin role", body = ErrorResponse)
    ),
    tag = "Clearance Records",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_session_records(
    State(state): State<AppState>,
    ValidatedPath(session_id): ValidatedPath<SessionId>,
) -> Result<Json<Vec<ClearanceRecord>>, AppError> {
    let records =
        ClearanceRecordService::list_records_by_session(state.store.as_ref(), session_id).await?;
    Ok(Json(records))
}
