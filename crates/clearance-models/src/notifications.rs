//! Notification models.
//!
//! A notification is addressed to exactly one [`Recipient`]: a staff user or
//! a student. Storage keeps one nullable column per recipient kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ids::{NotificationId, StaffUserId, StudentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    Staff(StaffUserId),
    Student(StudentId),
}

impl Recipient {
    pub fn staff_id(&self) -> Option<StaffUserId> {
        match self {
            Recipient::Staff(id) => Some(*id),
            Recipient::Student(_) => None,
        }
    }

    pub fn student_id(&self) -> Option<StudentId> {
        match self {
            Recipient::Student(id) => Some(*id),
            Recipient::Staff(_) => None,
        }
    }

    /// Rebuilds a recipient from its storage columns. Returns `None` unless
    /// exactly one column is set.
    pub fn from_columns(staff: Option<StaffUserId>, student: Option<StudentId>) -> Option<Self> {
        match (staff, student) {
            (Some(id), None) => Some(Recipient::Staff(id)),
            (None, Some(id)) => Some(Recipient::Student(id)),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: Recipient,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_serialization() {
        let json = serde_json::to_value(Recipient::Student(StudentId::new(42))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "student", "id": 42}));

        let json = serde_json::to_value(Recipient::Staff(StaffUserId::new(3))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "staff", "id": 3}));
    }

    #[test]
    fn test_recipient_from_columns() {
        assert_eq!(
            Recipient::from_columns(Some(StaffUserId::new(1)), None),
            Some(Recipient::Staff(StaffUserId::new(1)))
        );
        assert_eq!(
            Recipient::from_columns(None, Some(StudentId::new(2))),
            Some(Recipient::Student(StudentId::new(2)))
        );
        assert_eq!(Recipient::from_columns(None, None), None);
        assert_eq!(
            Recipient::from_columns(Some(StaffUserId::new(1)), Some(StudentId::new(2))),
            None
        );
    }

    #[test]
    fn test_recipient_accessors() {
        let recipient = Recipient::Staff(StaffUserId::new(5));
        assert_eq!(recipient.staff_id(), Some(StaffUserId::new(5)));
        assert_eq!(recipient.student_id(), None);
    }
}
