//! Session lookups while the store is failing: requests stay anonymous and
//! valid cookies survive.

mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn test_failed_lookup_keeps_cookie_on_login_page() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;
    let cookie = login(&app, "alice@example.com").await;

    take_sessions_offline(&db).await;
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_header(&response).is_none());

    restore_sessions(&db).await;
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/monthly-income"));
}

#[tokio::test]
async fn test_failed_lookup_keeps_cookie_on_member_pages() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;
    let cookie = login(&app, "alice@example.com").await;

    take_sessions_offline(&db).await;
    let response = send(&app, get("/user/documents", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    assert!(session_header(&response).is_none());
}

#[tokio::test]
async fn test_failed_lookup_leaves_request_anonymous() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;
    let cookie = login(&app, "alice@example.com").await;

    take_sessions_offline(&db).await;

    let page = send(&app, get("/monthly-income", Some(&cookie))).await;
    assert_eq!(page.status(), StatusCode::FOUND);
    assert_eq!(location(&page), Some("/login"));

    let api = send(&app, get("/api/documents", Some(&cookie))).await;
    assert_eq!(api.status(), StatusCode::UNAUTHORIZED);

    let action = send(
        &app,
        post_form("/monthly-income/create-month", "year_month=2024-03", Some(&cookie)),
    )
    .await;
    assert_eq!(action.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_cookie_is_cleared_on_member_pages() {
    let (app, _db) = setup_app().await;
    let stale = format!("session={}", "cd".repeat(32));

    let response = send(&app, get("/user/documents", Some(&stale))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(session_header(&response).unwrap().contains("Max-Age=0"));
}
