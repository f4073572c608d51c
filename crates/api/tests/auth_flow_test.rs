//! Login, logout and route guard behavior through the full router.

mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn test_login_sets_cookie_and_redirects_home() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;

    let response = send(
        &app,
        post_form(
            "/login",
            &format!("email=alice@example.com&password={PASSWORD}"),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/monthly-income"));
    let header = session_header(&response).unwrap();
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age="));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;

    let wrong_password = send(
        &app,
        post_form("/login", "email=alice@example.com&password=nope", None),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(session_pair(&wrong_password).is_none());

    let unknown_user = send(
        &app,
        post_form(
            "/login",
            &format!("email=bob@example.com&password={PASSWORD}"),
            None,
        ),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(unknown_user).await;
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (app, _db) = setup_app().await;

    let response = send(&app, post_form("/login", "email=alice@example.com", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_without_store_is_server_error() {
    let app = storeless_app();

    let response = send(
        &app,
        post_form("/login", "email=alice@example.com&password=secret", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_signed_in_user_skips_login_page() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;
    let cookie = login(&app, "alice@example.com").await;

    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/monthly-income"));

    let landing = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(landing.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_stale_cookie_on_login_page_is_cleared() {
    let (app, _db) = setup_app().await;
    let stale = format!("session={}", "ab".repeat(32));

    let response = send(&app, get("/login", Some(&stale))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_header(&response).is_some());
    assert_eq!(body_json(response).await["page"], "login");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, db) = setup_app().await;
    create_user(&db, "alice@example.com").await;
    let cookie = login(&app, "alice@example.com").await;

    let before = send(&app, get("/user/documents", Some(&cookie))).await;
    assert_eq!(before.status(), StatusCode::OK);

    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
    assert!(session_header(&response).unwrap().contains("Max-Age=0"));

    let after = send(&app, get("/user/documents", Some(&cookie))).await;
    assert_eq!(after.status(), StatusCode::FOUND);
    assert_eq!(location(&after), Some("/"));
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let app = storeless_app();

    let response = send(&app, post_form("/logout", "", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let (app, _db) = setup_app().await;

    for uri in ["/monthly-income", "/monthly-comparison", "/reports", "/monthly-assets"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&response), Some("/login"), "{uri}");
    }
}

#[tokio::test]
async fn test_protected_actions_are_unauthorized() {
    let (app, _db) = setup_app().await;

    let response = send(
        &app,
        post_form("/monthly-income/create-month", "year_month=2024-03", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_member_pages_redirect_to_landing() {
    let (app, _db) = setup_app().await;

    let response = send(&app, get("/user/assets-comparison", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn test_health_needs_no_session() {
    let app = storeless_app();

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_health_reports_store() {
    let (app, _db) = setup_app().await;

    let body = body_json(send(&app, get("/health", None)).await).await;
    assert_eq!(body["store"], true);
    assert_eq!(body_json(send(&storeless_app(), get("/health", None)).await).await["store"], false);
}
