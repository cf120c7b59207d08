//! In-memory user store implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use entities::{NewUser, User, UserPatch};
use tokio::sync::RwLock;

use crate::{UserStore, UserStoreError, UserStoreResult};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// In-memory user store for testing purposes.
///
/// Mirrors the PostgreSQL store's semantics, including the authoritative
/// email uniqueness check on create and update.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    /// Creates a new in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser) -> UserStoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == new.email) {
            return Err(UserStoreError::duplicate_email(&new.email));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            email: new.email,
            full_name: new.full_name,
            department: new.department,
            assigned_training: new.assigned_training,
            completed_training: new.completed_training,
            status: new.status,
            created_at: now,
            updated_at: now,
        };

        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: i64) -> UserStoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserStoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User> {
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&id) {
            return Err(UserStoreError::not_found(id));
        }

        // Conflict check before any field is touched, so a failed update
        // leaves the record exactly as it was.
        if let Some(email) = patch.email.as_deref() {
            if inner.users.values().any(|u| u.email == email && u.id != id) {
                return Err(UserStoreError::duplicate_email(email));
            }
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Err(UserStoreError::not_found(id));
        };

        if patch.is_empty() {
            return Ok(user.clone());
        }

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(full_name) = patch.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }
        if let Some(assigned_training) = patch.assigned_training {
            user.assigned_training = Some(assigned_training);
        }
        if let Some(completed_training) = patch.completed_training {
            user.completed_training = Some(completed_training);
        }
        if let Some(status) = patch.status {
            user.status = Some(status);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> UserStoreResult<()> {
        let mut inner = self.inner.write().await;

        if inner.users.remove(&id).is_none() {
            return Err(UserStoreError::not_found(id));
        }

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> UserStoreResult<(Vec<User>, u64)> {
        let inner = self.inner.read().await;

        let mut all: Vec<User> = inner.users.values().cloned().collect();
        all.sort_by_key(|u| u.id);

        let total = all.len() as u64;
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        let items = all.into_iter().skip(offset).take(limit).collect();

        Ok((items, total))
    }
}
