use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use clearance_auth::Payload;
use clearance_models::{
    ClearanceRecord, ClearanceRequest, ClearanceRequestWithRecords, ClearanceStatus, LoginRequest,
    LoginResponse, Notification, Recipient, StaffUser, UpdateClearanceRecordStatusDto,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::clearance_requests::controller::submit_clearance_request,
        crate::modules::clearance_requests::controller::list_student_clearance_requests,
        crate::modules::clearance_requests::controller::get_clearance_request,
        crate::modules::clearance_requests::controller::list_clearance_request_records,
        crate::modules::clearance_records::controller::update_clearance_record_status,
        crate::modules::clearance_records::controller::get_clearance_record,
        crate::modules::clearance_records::controller::list_student_records,
        crate::modules::clearance_records::controller::list_session_records,
        crate::modules::notifications::controller::get_notification,
        crate::modules::notifications::controller::list_user_notifications,
        crate::modules::notifications::controller::list_student_notifications,
        crate::modules::notifications::controller::mark_notification_read,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            Payload,
            StaffUser,
            ClearanceStatus,
            ClearanceRequest,
            ClearanceRequestWithRecords,
            ClearanceRecord,
            UpdateClearanceRecordStatusDto,
            Notification,
            Recipient,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Staff login"),
        (name = "Clearance Requests", description = "Submitting and reading clearance requests"),
        (name = "Clearance Records", description = "Approving, rejecting and reading clearance records"),
        (name = "Notifications", description = "Workflow notifications for staff and students")
    ),
    info(
        title = "Clearance API",
        version = "0.1.0",
        description = "Student clearance workflow: requests fan out to per-item records that departments approve or reject.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
