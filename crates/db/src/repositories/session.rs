//! Session repository for database operations.
//!
//! A session row maps an opaque token (the cookie value) to a user until its
//! expiry. Absent and expired tokens both resolve to "no user"; only store
//! failures surface as errors.

use chrono::{DateTime, Utc};
use kakeibo_core::auth::{SessionLifetime, SessionTtl, generate_session_id, is_active};
use kakeibo_shared::CurrentUser;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::debug;

use crate::entities::{sessions, users};

/// Session repository for create/validate/delete.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
    ttl: SessionTtl,
}

impl SessionRepository {
    /// Creates a session repository with the default lifetimes.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_ttl(db, SessionTtl::default())
    }

    /// Creates a session repository with custom lifetimes.
    #[must_use]
    pub const fn with_ttl(db: DatabaseConnection, ttl: SessionTtl) -> Self {
        Self { db, ttl }
    }

    /// Lifetimes used by [`Self::create`].
    #[must_use]
    pub const fn ttl(&self) -> SessionTtl {
        self.ttl
    }

    /// Creates a session for `user_id` and returns its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, user_id: i32, lifetime: SessionLifetime) -> Result<String, DbErr> {
        let expires_at = self.ttl.expires_at(lifetime, Utc::now());
        self.create_expiring(user_id, expires_at).await
    }

    /// Creates a session with an explicit expiry and returns its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_expiring(
        &self,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<String, DbErr> {
        let token = generate_session_id();

        sessions::ActiveModel {
            id: Set(token.clone()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        debug!(user_id, %expires_at, "Session created");
        Ok(token)
    }

    /// Resolves a token to its user if the session is still active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn validate(&self, token: &str) -> Result<Option<CurrentUser>, DbErr> {
        self.validate_at(token, Utc::now()).await
    }

    /// Like [`Self::validate`], against an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CurrentUser>, DbErr> {
        let found = sessions::Entity::find_by_id(token.to_string())
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;

        Ok(match found {
            Some((session, Some(user))) if is_active(session.expires_at, now) => {
                Some(CurrentUser::new(user.id, user.email))
            }
            _ => None,
        })
    }

    /// Deletes a session. Deleting an unknown token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, token: &str) -> Result<(), DbErr> {
        sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Removes sessions that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
