use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_clearance_request, list_clearance_request_records, list_student_clearance_requests,
    submit_clearance_request,
};

pub fn init_clearance_requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/students/{id}/clearance_request",
            post(submit_clearance_request),
        )
        .route(
            "/students/{id}/clearance_requests",
            get(list_student_clearance_requests),
        )
        .route("/clearance_requests/{id}", get(get_clearance_request))
        .route(
            "/clearance_requests/{id}/records",
            get(list_clearance_request_records),
        )
}
