//! Student entity.
//!
//! Students are managed outside the clearance workflow; the workflow only
//! reads them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{DepartmentId, StudentId};

/// A student who can be cleared.
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub student_number: String,
    pub full_name: String,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
}

