//! User store trait definition.

use async_trait::async_trait;
use entities::{NewUser, User, UserPatch};

use crate::UserStoreResult;

/// Trait for user record storage operations.
///
/// Every write is atomic: it either applies completely or leaves the table
/// untouched. Implementations enforce email uniqueness themselves, so a
/// `create` or `update` can fail with
/// [`DuplicateEmail`](crate::UserStoreError::DuplicateEmail) even when the
/// caller checked first.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new record, assigning its identifier and timestamps.
    async fn create(&self, new: NewUser) -> UserStoreResult<User>;

    /// Gets a record by identifier.
    async fn get(&self, id: i64) -> UserStoreResult<Option<User>>;

    /// Gets a record by email address.
    async fn find_by_email(&self, email: &str) -> UserStoreResult<Option<User>>;

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// All supplied fields are applied together or not at all. An empty
    /// patch returns the record unchanged.
    async fn update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User>;

    /// Removes a record permanently.
    async fn delete(&self, id: i64) -> UserStoreResult<()>;

    /// Lists records ordered by identifier ascending.
    ///
    /// Returns the requested window plus the total count of all records,
    /// both taken from one consistent snapshot.
    async fn list(&self, offset: i64, limit: i64) -> UserStoreResult<(Vec<User>, u64)>;
}
