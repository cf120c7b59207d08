//! User record API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use entities::{NewUser, User, UserPage, UserPatch};
use serde::Deserialize;
use user_store::UserStore;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Creates a user record.
pub async fn create_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_email(&payload.email)?;

    let user = state.users.create(payload).await?;

    tracing::info!(user_id = user.id, "user created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Gets a user record by id.
pub async fn get_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state.users.get(id).await?;

    Ok(Json(user))
}

/// Applies a partial update to a user record.
pub async fn update_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    if let Some(email) = patch.email.as_deref() {
        validate_email(email)?;
    }

    let user = state.users.update(id, patch).await?;

    tracing::info!(user_id = id, "user updated");

    Ok(Json(user))
}

/// Deletes a user record.
pub async fn delete_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete(id).await?;

    tracing::info!(user_id = id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Lists user records with pagination.
pub async fn list_users<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<UserPage>> {
    let page = state.users.list(query.page, query.per_page).await?;

    Ok(Json(page))
}

/// Syntactic email check, standing in front of the record service.
fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "invalid email address: {email}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "plainaddress",
            "@x.com",
            "a@",
            "a@nodot",
            "a@.com",
            "a@x.com.",
            "a b@x.com",
            "a@x@y.com",
        ] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
    }
}
