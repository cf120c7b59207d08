//! User record entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status assigned to a user record by an admin.
///
/// A record whose status column is NULL carries `None` at the type level:
/// "not reviewed" is distinct from "reviewed and left pending".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    /// Returns the wire/storage representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a storage value back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A stored user record.
///
/// The identifier and both timestamps are assigned by the store; they never
/// arrive from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, unique and never reused.
    pub id: i64,
    /// Email address, unique across all live records.
    pub email: String,
    /// Full display name.
    pub full_name: Option<String>,
    /// Department the user belongs to.
    pub department: Option<String>,
    /// Number of training courses assigned.
    pub assigned_training: Option<i32>,
    /// Number of training courses completed.
    pub completed_training: Option<i32>,
    /// Admin review status, `None` when unset.
    pub status: Option<UserStatus>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub assigned_training: Option<i32>,
    pub completed_training: Option<i32>,
    pub status: Option<UserStatus>,
}

impl NewUser {
    /// Creates an input carrying only the required email field.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: None,
            department: None,
            assigned_training: None,
            completed_training: None,
            status: None,
        }
    }
}

/// Partial update for a user record.
///
/// Fields left as `None` are not touched by the update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub assigned_training: Option<i32>,
    pub completed_training: Option<i32>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    /// Returns true when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.department.is_none()
            && self.assigned_training.is_none()
            && self.completed_training.is_none()
            && self.status.is_none()
    }
}

/// One page of user records plus the listing totals.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    /// Records on this page, ordered by identifier ascending.
    pub items: Vec<User>,
    /// Count of all records, not just this page.
    pub total: u64,
    /// Normalized page number actually used.
    pub page: i64,
    /// Normalized page size actually used.
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [UserStatus::Pending, UserStatus::Approved, UserStatus::Rejected] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("archived"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&UserStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn patch_reports_empty() {
        assert!(UserPatch::default().is_empty());

        let patch = UserPatch {
            department: Some("Security".to_string()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn new_user_deserializes_with_optional_fields_missing() {
        let input: NewUser = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert_eq!(input.email, "a@x.com");
        assert!(input.full_name.is_none());
        assert!(input.status.is_none());
    }
}
