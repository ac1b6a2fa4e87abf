//! # Clearance Models
//!
//! Domain entities and DTOs for the Clearance API.
//!
//! # Modules
//!
//! - [`ids`]: typed `i64` identifiers
//! - [`students`]: students (read-only to the workflow)
//! - [`staff`]: staff users, credentials and role names
//! - [`sessions`]: clearance sessions
//! - [`items`]: clearance checklist items
//! - [`requests`]: clearance requests
//! - [`records`]: clearance records and [`ClearanceStatus`]
//! - [`notifications`]: notifications and [`Recipient`]
//! - [`auth`]: login DTOs

pub mod auth;
pub mod ids;
pub mod items;
pub mod notifications;
pub mod records;
pub mod requests;
pub mod sessions;
pub mod staff;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse};
pub use ids::{
    ClearanceItemId, ClearanceRecordId, ClearanceRequestId, DepartmentId, NotificationId, RoleId,
    SessionId, StaffUserId, StudentId,
};
pub use items::ClearanceItem;
pub use notifications::{Notification, Recipient};
pub use records::{
    ClearanceRecord, ClearanceStatus, RecordStatusUpdate, UpdateClearanceRecordStatusDto,
};
pub use requests::{ClearanceRequest, ClearanceRequestWithRecords};
pub use sessions::ClearanceSession;
pub use staff::{StaffCredentials, StaffUser, roles};
pub use students::Student;
