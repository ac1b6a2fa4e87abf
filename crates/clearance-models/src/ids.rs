//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses a `BIGSERIAL` primary key. Wrapping those keys keeps a
//! `StudentId` from being passed where a `ClearanceRecordId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use clearance_models::ids::{ClearanceRecordId, StudentId};
//!
//! fn get_student(id: StudentId) { /* ... */ }
//!
//! get_student(StudentId::new(42));            // OK
//! // get_student(ClearanceRecordId::new(42)); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Defines an `i64` newtype that encodes as `BIGINT` and serializes as a bare number.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
            ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a student.
    StudentId
);

define_id!(
    /// Identifier of a staff user account.
    StaffUserId
);

define_id!(
    /// Identifier of a role.
    RoleId
);

define_id!(
    /// Identifier of a department.
    DepartmentId
);

define_id!(
    /// Identifier of a clearance session (cycle).
    SessionId
);

define_id!(
    /// Identifier of a clearance checklist item.
    ClearanceItemId
);

define_id!(
    /// Identifier of a student's clearance request.
    ClearanceRequestId
);

define_id!(
    /// Identifier of a per-item clearance record.
    ClearanceRecordId
);

define_id!(
    /// Identifier of a notification.
    NotificationId
);
