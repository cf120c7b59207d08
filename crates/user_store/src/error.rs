//! User store error types.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// No record exists with the requested identifier.
    #[error("user not found: {id}")]
    NotFound { id: i64 },

    /// Another live record already holds this email address.
    #[error("email already exists: {email}")]
    DuplicateEmail { email: String },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserStoreError {
    /// Creates a not found error.
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Creates a duplicate email error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;
