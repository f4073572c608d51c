//! Integration tests for the session and user repositories.

mod common;

use chrono::{Duration, Utc};
use common::{create_user, setup_db};
use kakeibo_core::auth::{SessionLifetime, SessionTtl, is_session_id};
use kakeibo_db::{SessionRepository, UserRepository};

#[tokio::test]
async fn test_session_create_and_validate() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = SessionRepository::new(db.clone());

    let token = repo
        .create(user.id, SessionLifetime::Extended)
        .await
        .expect("Failed to create session");
    assert!(is_session_id(&token));

    let current = repo
        .validate(&token)
        .await
        .expect("Failed to validate session")
        .expect("Session should be active");
    assert_eq!(current.id, user.id);
    assert_eq!(current.email, "alice@example.com");
}

#[tokio::test]
async fn test_session_lifetimes_follow_ttl() {
    let db = setup_db().await;
    let user = create_user(&db, "ttl@example.com").await;
    let ttl = SessionTtl {
        standard_days: 1,
        extended_days: 3,
    };
    let repo = SessionRepository::with_ttl(db.clone(), ttl);

    let standard = repo.create(user.id, SessionLifetime::Standard).await.unwrap();
    let extended = repo.create(user.id, SessionLifetime::Extended).await.unwrap();

    let in_two_days = Utc::now() + Duration::days(2);
    assert!(repo.validate_at(&standard, in_two_days).await.unwrap().is_none());
    assert!(repo.validate_at(&extended, in_two_days).await.unwrap().is_some());
}

#[tokio::test]
async fn test_past_dated_session_is_rejected() {
    let db = setup_db().await;
    let user = create_user(&db, "bob@example.com").await;
    let repo = SessionRepository::new(db.clone());

    let token = repo
        .create_expiring(user.id, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    assert!(repo.validate(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_future_dated_session_valid_until_expiry() {
    let db = setup_db().await;
    let user = create_user(&db, "carol@example.com").await;
    let repo = SessionRepository::new(db.clone());

    let expires_at = Utc::now() + Duration::hours(1);
    let token = repo.create_expiring(user.id, expires_at).await.unwrap();

    let before = expires_at - Duration::seconds(1);
    assert!(repo.validate_at(&token, before).await.unwrap().is_some());
    let after = expires_at + Duration::seconds(1);
    assert!(repo.validate_at(&token, after).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_token_is_anonymous() {
    let db = setup_db().await;
    let repo = SessionRepository::new(db.clone());

    assert!(repo.validate("not-a-token").await.unwrap().is_none());
    assert!(repo.validate(&"0".repeat(64)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_delete() {
    let db = setup_db().await;
    let user = create_user(&db, "dave@example.com").await;
    let repo = SessionRepository::new(db.clone());

    let token = repo.create(user.id, SessionLifetime::Standard).await.unwrap();
    repo.delete(&token).await.expect("Failed to delete session");
    assert!(repo.validate(&token).await.unwrap().is_none());

    // Deleting again is a no-op.
    repo.delete(&token).await.expect("Second delete should succeed");
}

#[tokio::test]
async fn test_delete_expired_keeps_active_sessions() {
    let db = setup_db().await;
    let user = create_user(&db, "erin@example.com").await;
    let repo = SessionRepository::new(db.clone());

    let now = Utc::now();
    repo.create_expiring(user.id, now - Duration::days(1)).await.unwrap();
    repo.create_expiring(user.id, now - Duration::minutes(5)).await.unwrap();
    let active = repo.create_expiring(user.id, now + Duration::days(1)).await.unwrap();

    let removed = repo.delete_expired(now).await.unwrap();
    assert_eq!(removed, 2);
    assert!(repo.validate(&active).await.unwrap().is_some());
}

#[tokio::test]
async fn test_user_lookup_is_exact() {
    let db = setup_db().await;
    let user = create_user(&db, "Frank@example.com").await;
    let repo = UserRepository::new(db.clone());

    let found = repo.find_by_email("Frank@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert!(repo.find_by_email("frank@example.com").await.unwrap().is_none());
    assert!(repo.find_by_id(user.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let db = setup_db().await;
    create_user(&db, "gina@example.com").await;

    let result = UserRepository::new(db.clone())
        .create("gina@example.com", "$argon2id$other")
        .await;
    assert!(result.is_err());
}
