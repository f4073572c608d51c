//! Route guards.
//!
//! Guards only read the identity the session gate attached. A page load
//! (GET or HEAD) without one is redirected; any other method gets a 401.

use axum::{
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use kakeibo_shared::CurrentUser;

use super::session::{SessionLookup, session_removal};
use crate::ApiError;

/// Where signed-in visitors of public-only pages are sent.
pub const HOME_PATH: &str = "/monthly-income";

/// Where anonymous page loads of the protected tree are sent.
pub const LOGIN_PATH: &str = "/login";

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn is_page_load(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn is_signed_in(request: &Request) -> bool {
    request.extensions().get::<CurrentUser>().is_some()
}

/// The cookie was looked up and matched no active session. A failed lookup
/// does not count: the session may still be valid.
fn has_stale_cookie(request: &Request) -> bool {
    request.extensions().get::<SessionLookup>() == Some(&SessionLookup::Unresolved)
}

/// Guard for the protected tree: anonymous page loads go to the login page.
pub async fn require_login(request: Request, next: Next) -> Response {
    if is_signed_in(&request) {
        return next.run(request).await;
    }
    if is_page_load(request.method()) {
        found(LOGIN_PATH)
    } else {
        ApiError::unauthorized().into_response()
    }
}

/// Guard for the `/user` tree: anonymous page loads go to the landing page
/// and lose a stale session cookie.
pub async fn require_member(jar: CookieJar, request: Request, next: Next) -> Response {
    if is_signed_in(&request) {
        return next.run(request).await;
    }
    if !is_page_load(request.method()) {
        return ApiError::unauthorized().into_response();
    }
    if has_stale_cookie(&request) {
        (jar.remove(session_removal()), found("/")).into_response()
    } else {
        found("/")
    }
}

/// Guard for pages only anonymous visitors see.
///
/// Signed-in visitors are redirected home. A cookie the store looked up and
/// did not find is cleared and the page still renders.
pub async fn public_only(jar: CookieJar, request: Request, next: Next) -> Response {
    if is_signed_in(&request) {
        return found(HOME_PATH);
    }
    if has_stale_cookie(&request) {
        let response = next.run(request).await;
        return (jar.remove(session_removal()), response).into_response();
    }
    next.run(request).await
}
