//! Session gate and identity extractor.
//!
//! The gate runs once per request, before any guard or handler. It resolves
//! the `session` cookie to a [`CurrentUser`] and stores it in the request
//! extensions. It never rejects: a missing, malformed or expired token and a
//! failing store all leave the request anonymous. The outcome of the lookup
//! is recorded as a [`SessionLookup`] so guards can tell a stale cookie from
//! an outage.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use kakeibo_core::auth::is_session_id;
use kakeibo_db::SessionRepository;
use kakeibo_shared::CurrentUser;
use tracing::{debug, warn};

use crate::{ApiError, AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// What the gate learned about the request's session cookie.
///
/// Present in the request extensions only when a cookie was sent and a store
/// is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLookup {
    /// The cookie resolved to an active session.
    Resolved,
    /// The cookie is malformed, unknown or expired.
    Unresolved,
    /// The store failed; the cookie may still be valid.
    Failed,
}

/// Resolves the session cookie and attaches the identity, if any.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let (Some(db), Some(cookie)) = (state.db.as_ref(), jar.get(SESSION_COOKIE)) {
        let token = cookie.value();
        let lookup = if is_session_id(token) {
            match SessionRepository::new(db.clone()).validate(token).await {
                Ok(Some(user)) => {
                    request.extensions_mut().insert(user);
                    SessionLookup::Resolved
                }
                Ok(None) => {
                    debug!("Session cookie did not resolve to an active session");
                    SessionLookup::Unresolved
                }
                Err(e) => {
                    warn!(error = %e, "Session lookup failed; continuing anonymously");
                    SessionLookup::Failed
                }
            }
        } else {
            debug!("Ignoring malformed session cookie");
            SessionLookup::Unresolved
        };
        request.extensions_mut().insert(lookup);
    }

    next.run(request).await
}

/// Builds the cookie that carries a new session token.
#[must_use]
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// The cookie to pass to [`CookieJar::remove`] to clear the session.
#[must_use]
pub fn session_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Extractor for the authenticated caller.
///
/// Rejects with `401 {"error": "Unauthorized"}` when the gate attached no
/// identity.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl AuthUser {
    /// Returns the user ID.
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.0.id
    }

    /// Returns the user's email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(ApiError::unauthorized)
    }
}
