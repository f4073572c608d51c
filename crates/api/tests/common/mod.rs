//! Shared setup for router integration tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use http_body_util::BodyExt;
use kakeibo_api::{AppState, create_router};
use kakeibo_core::auth::hash_password;
use kakeibo_db::{UserRepository, connect, run_migrations};
use kakeibo_shared::config::{DatabaseConfig, SessionConfig};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

/// Router over a fresh in-memory database.
pub async fn setup_app() -> (Router, DatabaseConnection) {
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect("sqlite::memory:", &config)
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&db).await.expect("Failed to run migrations");

    let state = AppState::new(Some(db.clone()), &SessionConfig::default());
    (create_router(state), db)
}

/// Router with no store configured.
pub fn storeless_app() -> Router {
    create_router(AppState::new(None, &SessionConfig::default()))
}

/// Inserts a user whose password is [`PASSWORD`].
pub async fn create_user(db: &DatabaseConnection, email: &str) -> i32 {
    let hash = hash_password(PASSWORD).expect("Failed to hash password");
    UserRepository::new(db.clone())
        .create(email, &hash)
        .await
        .expect("Failed to create test user")
        .id
}

/// Sends one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// GET with an optional `session=...` cookie pair.
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Form POST with an optional cookie pair.
pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// JSON request with an optional cookie pair.
pub fn json(method: &str, uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Logs in and returns the `session=<token>` pair to send back.
pub async fn login(app: &Router, email: &str) -> String {
    let response = send(
        app,
        post_form("/login", &format!("email={email}&password={PASSWORD}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    session_pair(&response).expect("login sets the session cookie")
}

/// The `name=value` part of the session `Set-Cookie` header, if any.
pub fn session_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// The full session `Set-Cookie` header, if any.
pub fn session_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .map(str::to_string)
}

/// The `Location` header.
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

/// Reads the body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Makes session lookups fail by renaming the sessions table.
pub async fn take_sessions_offline(db: &DatabaseConnection) {
    db.execute_unprepared("ALTER TABLE sessions RENAME TO sessions_offline")
        .await
        .expect("Failed to rename sessions table");
}

/// Undoes [`take_sessions_offline`].
pub async fn restore_sessions(db: &DatabaseConnection) {
    db.execute_unprepared("ALTER TABLE sessions_offline RENAME TO sessions")
        .await
        .expect("Failed to restore sessions table");
}
