//! Landing, login and logout.

use axum::{
    Form, Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use kakeibo_core::{
    auth::{SessionLifetime, verify_password},
    input::non_blank,
};
use kakeibo_db::{SessionRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    ApiError, ApiResult, AppState,
    middleware::{
        SESSION_COOKIE,
        guard::{HOME_PATH, found},
        session_cookie, session_removal,
    },
};

/// Creates the login and logout action routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Creates the public-only page routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login_page))
}

/// Data for a public page.
#[derive(Debug, Serialize)]
pub struct PublicPage {
    /// Page name.
    pub page: &'static str,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: Option<String>,
    password: Option<String>,
    remember: Option<String>,
}

/// GET / - Landing page.
async fn landing() -> Json<PublicPage> {
    Json(PublicPage { page: "landing" })
}

/// GET /login - Login page.
async fn login_page() -> Json<PublicPage> {
    Json(PublicPage { page: "login" })
}

/// POST /login - Verify credentials and start a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(CookieJar, Response)> {
    let (Some(email), Some(password)) = (non_blank(form.email), non_blank(form.password)) else {
        return Err(ApiError::validation("Email and password are required"));
    };
    let db = state.store()?;

    let Some(user) = UserRepository::new(db.clone()).find_by_email(&email).await? else {
        info!("Login attempt for unknown email");
        return Err(ApiError::invalid_credentials());
    };

    match verify_password(&password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt - invalid password");
            return Err(ApiError::invalid_credentials());
        }
        Err(e) => {
            error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
            return Err(ApiError::internal(e.to_string()));
        }
    }

    let lifetime = SessionLifetime::from_remember_flag(form.remember.as_deref());
    let token = SessionRepository::with_ttl(db.clone(), state.session_ttl)
        .create(user.id, lifetime)
        .await?;
    let cookie = session_cookie(
        token,
        state.session_ttl.max_age_secs(lifetime),
        state.secure_cookie,
    );

    info!(user_id = user.id, ?lifetime, "User logged in");
    Ok((jar.add(cookie), found(HOME_PATH)))
}

/// POST /logout - End the session. Always clears the cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let (Some(db), Some(cookie)) = (state.db.as_ref(), jar.get(SESSION_COOKIE)) {
        match SessionRepository::new(db.clone()).delete(cookie.value()).await {
            Ok(()) => info!("Session ended"),
            Err(e) => warn!(error = %e, "Failed to delete session on logout"),
        }
    }

    (jar.remove(session_removal()), found("/"))
}
