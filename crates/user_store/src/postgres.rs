//! PostgreSQL-backed user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{NewUser, User, UserPatch, UserStatus};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{UserStore, UserStoreError, UserStoreResult};

/// PostgreSQL error code for a unique constraint violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// SQL schema definition, applied idempotently at startup.
const SCHEMA_SQL: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    full_name VARCHAR(255),
    department VARCHAR(255),
    assigned_training INTEGER,
    completed_training INTEGER,
    status TEXT CHECK (status IN ('pending', 'approved', 'rejected')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Indexes
CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email);
CREATE INDEX IF NOT EXISTS ix_users_id ON users (id);
"#;

/// Row shape read back from the `users` table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    full_name: Option<String>,
    department: Option<String>,
    assigned_training: Option<i32>,
    completed_training: Option<i32>,
    status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            department: row.department,
            assigned_training: row.assigned_training,
            completed_training: row.completed_training,
            status: row.status.as_deref().and_then(UserStatus::parse),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// User store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connects to the database and returns a store over a fresh pool.
    pub async fn connect(database_url: &str) -> UserStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the bundled schema. Safe to run on every startup.
    pub async fn migrate(&self) -> UserStoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;

        tracing::debug!("users schema ensured");

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new: NewUser) -> UserStoreResult<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, full_name, department, assigned_training, completed_training, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, full_name, department, assigned_training, completed_training,
                      status, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.full_name)
        .bind(&new.department)
        .bind(new.assigned_training)
        .bind(new.completed_training)
        .bind(new.status.map(UserStatus::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                UserStoreError::duplicate_email(&new.email)
            } else {
                UserStoreError::Database(error)
            }
        })?;

        Ok(row.into())
    }

    async fn get(&self, id: i64) -> UserStoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, full_name, department, assigned_training, completed_training,
                   status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> UserStoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, full_name, department, assigned_training, completed_training,
                   status, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: i64, patch: UserPatch) -> UserStoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, full_name, department, assigned_training, completed_training,
                   status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Err(UserStoreError::not_found(id));
        };

        if let Some(email) = patch.email.as_deref() {
            let clash: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id <> $2")
                    .bind(email)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            if clash.is_some() {
                return Err(UserStoreError::duplicate_email(email));
            }
        }

        if patch.is_empty() {
            return Ok(existing.into());
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut needs_comma = false;

        if let Some(email) = &patch.email {
            builder.push("email = ").push_bind(email.clone());
            needs_comma = true;
        }

        if let Some(full_name) = &patch.full_name {
            if needs_comma {
                builder.push(", ");
            }
            builder.push("full_name = ").push_bind(full_name.clone());
            needs_comma = true;
        }

        if let Some(department) = &patch.department {
            if needs_comma {
                builder.push(", ");
            }
            builder.push("department = ").push_bind(department.clone());
            needs_comma = true;
        }

        if let Some(assigned_training) = patch.assigned_training {
            if needs_comma {
                builder.push(", ");
            }
            builder
                .push("assigned_training = ")
                .push_bind(assigned_training);
            needs_comma = true;
        }

        if let Some(completed_training) = patch.completed_training {
            if needs_comma {
                builder.push(", ");
            }
            builder
                .push("completed_training = ")
                .push_bind(completed_training);
            needs_comma = true;
        }

        if let Some(status) = patch.status {
            if needs_comma {
                builder.push(", ");
            }
            builder.push("status = ").push_bind(status.as_str());
        }

        builder
            .push(", updated_at = now() WHERE id = ")
            .push_bind(id)
            .push(
                " RETURNING id, email, full_name, department, assigned_training, \
                 completed_training, status, created_at, updated_at",
            );

        // The in-transaction clash check above narrows the race window; the
        // unique index still has the final word at commit time.
        let row: Option<UserRow> = builder
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|error| match patch.email.as_deref() {
                Some(email) if is_unique_violation(&error) => {
                    UserStoreError::duplicate_email(email)
                }
                _ => UserStoreError::Database(error),
            })?;

        let Some(row) = row else {
            return Err(UserStoreError::not_found(id));
        };

        tx.commit().await?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> UserStoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::not_found(id));
        }

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> UserStoreResult<(Vec<User>, u64)> {
        // Count and page read inside one transaction so both come from a
        // consistent snapshot of the table.
        let mut tx = self.pool.begin().await?;

        let (total_raw,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, full_name, department, assigned_training, completed_training,
                   status, created_at, updated_at
            FROM users
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let total = u64::try_from(total_raw).unwrap_or(0);

        Ok((rows.into_iter().map(User::from).collect(), total))
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_error) if db_error.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
    )
}
