use api_server::{config::Config, create_app, create_state};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use user_store::MemoryUserStore;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        allow_all_origins: true,
        allowed_origins: Vec::new(),
        log_level: "info".to_string(),
    }
}

fn app() -> Router {
    create_app(create_state(test_config(), MemoryUserStore::new()))
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

async fn send_empty(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

#[tokio::test]
async fn create_returns_created_record() {
    let app = app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({
            "email": "ada@example.com",
            "full_name": "Ada Lovelace",
            "department": "Engineering"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["status"], "pending");
    assert_ne!(body["created_at"], Value::Null);
    assert_ne!(body["updated_at"], Value::Null);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = app();

    let (_status, _) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "ada@example.com" }),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "ada@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn malformed_email_is_unprocessable() {
    let app = app();

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "not-an-address" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let app = app();

    let (status, body) = send_empty(&app, Method::GET, "/users/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn put_applies_partial_update() {
    let app = app();

    let (_status, created) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({
            "email": "ada@example.com",
            "full_name": "Ada Lovelace",
            "assigned_training": 4
        }),
    )
    .await;
    let id = created["id"].as_i64().expect("created response should have id");

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        json!({ "status": "approved", "completed_training": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "approved");
    assert_eq!(updated["completed_training"], 2);
    assert_eq!(updated["full_name"], "Ada Lovelace");
    assert_eq!(updated["assigned_training"], 4);
    assert_eq!(updated["email"], "ada@example.com");
}

#[tokio::test]
async fn put_with_taken_email_is_conflict_and_changes_nothing() {
    let app = app();

    let (_status, _) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "taken@example.com" }),
    )
    .await;
    let (_status, created) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "b@example.com", "department": "Sales" }),
    )
    .await;
    let id = created["id"].as_i64().expect("created response should have id");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/users/{id}"),
        json!({ "email": "taken@example.com", "department": "Marketing" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");

    let (status, after) = send_empty(&app, Method::GET, &format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["email"], "b@example.com");
    assert_eq!(after["department"], "Sales");
}

#[tokio::test]
async fn put_missing_record_is_not_found() {
    let app = app();

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/users/42",
        json!({ "full_name": "Nobody" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_record() {
    let app = app();

    let (_status, created) = send_json(
        &app,
        Method::POST,
        "/users/",
        json!({ "email": "ada@example.com" }),
    )
    .await;
    let id = created["id"].as_i64().expect("created response should have id");

    let (status, body) = send_empty(&app, Method::DELETE, &format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send_empty(&app, Method::GET, &format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_empty(&app, Method::DELETE, &format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates_and_reports_total() {
    let app = app();

    for i in 0..5 {
        let (_status, _) = send_json(
            &app,
            Method::POST,
            "/users/",
            json!({ "email": format!("user{i}@example.com") }),
        )
        .await;
    }

    let (status, page) = send_empty(&app, Method::GET, "/users/?page=2&per_page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["per_page"], 2);
    let items = page["items"].as_array().expect("items should be array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 3);
    assert_eq!(items[1]["id"], 4);
}

#[tokio::test]
async fn list_normalizes_out_of_range_parameters() {
    let app = app();

    for i in 0..3 {
        let (_status, _) = send_json(
            &app,
            Method::POST,
            "/users/",
            json!({ "email": format!("user{i}@example.com") }),
        )
        .await;
    }

    let (status, zero_page) = send_empty(&app, Method::GET, "/users/?page=0&per_page=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zero_page["page"], 1);

    let (_status, first_page) = send_empty(&app, Method::GET, "/users/?page=1&per_page=5").await;
    assert_eq!(zero_page["items"], first_page["items"]);

    let (status, defaulted) = send_empty(&app, Method::GET, "/users/?page=1&per_page=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaulted["per_page"], 10);
}

#[tokio::test]
async fn healthcheck_is_available() {
    let app = app();

    let (status, body) = send_empty(&app, Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
