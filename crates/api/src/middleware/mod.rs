//! Request middleware: the session gate and the route guards.

pub mod guard;
pub mod session;

pub use guard::{public_only, require_login, require_member};
pub use session::{
    AuthUser, SESSION_COOKIE, SessionLookup, session_cookie, session_gate, session_removal,
};
