use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    get_notification, list_student_notifications, list_user_notifications, mark_notification_read,
};

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_notification))
        .route("/{id}/read", patch(mark_notification_read))
        .route("/user/{id}", get(list_user_notifications))
        .route("/student/{id}", get(list_student_notifications))
}
