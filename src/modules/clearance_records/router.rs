use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    get_clearance_record, list_session_records, list_student_records,
    update_clearance_record_status,
};

pub fn init_clearance_records_router() -> Router<AppState> {
    Router::new()
        .route("/clearance_records/{id}", get(get_clearance_record))
        .route(
            "/clearance_records/{id}/status",
            patch(update_clearance_record_status),
        )
        .route("/students/{id}/records", get(list_student_records))
}

/// Session-wide reporting, mounted behind the admin gate.
pub fn init_session_records_router() -> Router<AppState> {
    Router::new().route("/sessions/{id}/records", get(list_session_records))
}
