use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::session::Session;
use crate::state::AppState;

pub mod dto;
pub mod handlers;

pub const SESSION_COOKIE: &str = "session_id";

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Admin status comes from the raw, client-submitted username only. A
/// crafted username that tricks the credential query into matching the
/// admin row must still not mint an admin session.
pub fn is_admin_username(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("admin")
}

/// Resolves the live session for the request's cookie, if any.
pub fn session_from_jar(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let id = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())?;
    state.sessions.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_admin_is_admin() {
        assert!(is_admin_username("admin"));
        assert!(is_admin_username("Admin"));
        assert!(is_admin_username("  ADMIN  "));
    }

    #[test]
    fn injection_payload_usernames_are_not_admin() {
        assert!(!is_admin_username("' OR '1'='1"));
        assert!(!is_admin_username("admin' --"));
        assert!(!is_admin_username("' UNION SELECT * FROM users --"));
    }

    #[test]
    fn empty_and_other_users_are_not_admin() {
        assert!(!is_admin_username(""));
        assert!(!is_admin_username("   "));
        assert!(!is_admin_username("user1"));
        assert!(!is_admin_username("administrator"));
    }
}
