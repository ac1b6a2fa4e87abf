use axum::{Json, extract::State};
use tracing::instrument;

use clearance_core::AppError;
use clearance_models::{Notification, NotificationId, Recipient, StaffUserId, StudentId};

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedPath;

use super::service::NotificationService;

#[utoipa::path(
    get,
    path = "/api/notifications/{id}",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification", body = Notification),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_notification(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationService::get_notification(state.store.as_ref(), id).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    get,
    path = "/api/notifications/user/{id}",
    params(("id" = i64, Path, description = "Staff user ID")),
    responses(
        (status = 200, description = "Notifications for the staff user, newest first", body = [Notification]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_user_notifications(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StaffUserId>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications =
        NotificationService::list_notifications(state.store.as_ref(), Recipient::Staff(id)).await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    get,
    path = "/api/notifications/student/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Notifications for the student, newest first", body = [Notification]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_student_notifications(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications =
        NotificationService::list_notifications(state.store.as_ref(), Recipient::Student(id))
            .await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    let notification =
        NotificationService::mark_notification_read(state.store.as_ref(), id).await?;
    Ok(Json(notification))
}
