//! User record service.
//!
//! Orchestrates the store: enforces the email uniqueness contract across
//! its two layers (advisory pre-check, authoritative store constraint) and
//! computes safe pagination windows.

use entities::{NewUser, User, UserPage, UserPatch, UserStatus};
use user_store::{UserStore, UserStoreError, UserStoreResult};

/// Page size used when the caller supplies none, or a non-positive one.
const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound on the page size a caller may request.
const MAX_PER_PAGE: i64 = 100;

/// Service over a single user record store.
///
/// The store handle is injected at construction; the service holds no
/// other state.
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    /// Creates a service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a record, assigning id and timestamps.
    ///
    /// The lookup before the insert exists only to give the common
    /// duplicate case a clean failure without a wasted write; the store's
    /// unique index is what actually guarantees uniqueness when two
    /// creates race.
    pub async fn create(&self, mut input: NewUser) -> UserStoreResult<User> {
        if let Some(existing) = self.store.find_by_email(&input.email).await? {
            return Err(UserStoreError::duplicate_email(existing.email));
        }

        if input.status.is_none() {
            input.status = Some(UserStatus::Pending);
        }

        self.store.create(input).await
    }

    /// Returns the record with this id.
    pub async fn get(&self, id: i64) -> UserStoreResult<User> {
        self.store
            .get(id)
            .await?
            .ok_or(UserStoreError::NotFound { id })
    }

    /// Applies a partial update to the record with this id.
    ///
    /// A patch carrying an email held by a different record fails before
    /// any field is applied; the store then applies all supplied fields
    /// atomically, so a conflict in the remaining race window also leaves
    /// the record untouched.
    pub async fn update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User> {
        let current = self.get(id).await?;

        if let Some(email) = patch.email.as_deref() {
            if let Some(other) = self.store.find_by_email(email).await? {
                if other.id != current.id {
                    return Err(UserStoreError::duplicate_email(email));
                }
            }
        }

        self.store.update(id, patch).await
    }

    /// Removes the record with this id.
    pub async fn delete(&self, id: i64) -> UserStoreResult<()> {
        self.store.delete(id).await
    }

    /// Returns one page of records plus the total count of all records.
    ///
    /// Out-of-range inputs are coerced rather than rejected: pages below 1
    /// become page 1, non-positive sizes become the default, oversized
    /// ones are capped. The normalized values are echoed back in the page.
    pub async fn list(
        &self,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> UserStoreResult<UserPage> {
        let page = normalize_page(page);
        let per_page = normalize_per_page(per_page);
        let offset = (page - 1) * per_page;

        let (items, total) = self.store.list(offset, per_page).await?;

        Ok(UserPage {
            items,
            total,
            page,
            per_page,
        })
    }
}

fn normalize_page(page: Option<i64>) -> i64 {
    match page {
        Some(page) if page >= 1 => page,
        _ => 1,
    }
}

fn normalize_per_page(per_page: Option<i64>) -> i64 {
    match per_page {
        Some(per_page) if per_page >= 1 => per_page.min(MAX_PER_PAGE),
        _ => DEFAULT_PER_PAGE,
    }
}
