use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sqlx::FromRow;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, LoginUser, LogoutResponse, SessionResponse},
        is_admin_username, session_from_jar, SESSION_COOKIE,
    },
    error::ApiError,
    session::Session,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(get_session))
        .route("/logout", post(logout))
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    username: String,
    #[allow(dead_code)]
    password: String,
    role: String,
}

/// Builds the credential check by direct string interpolation. Intentionally
/// injectable: this is the teaching surface, do not parameterize it.
fn login_query(username: &str, password: &str) -> String {
    format!(
        "SELECT id, username, password, role FROM users WHERE username = '{username}' AND password = '{password}'"
    )
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let query = login_query(&payload.username, &payload.password);

    let user = sqlx::query_as::<_, UserRow>(&query)
        .fetch_optional(&state.db)
        .await?;

    let Some(user) = user else {
        warn!(username = %payload.username, "login rejected");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    };

    // The admin flag must come from the submitted username, never from the
    // row the (injectable) query happened to match.
    let original_username = payload.username.trim().to_string();
    let is_admin_user = is_admin_username(&payload.username);

    let session_id = Uuid::new_v4();
    state.sessions.insert(Session {
        session_id,
        username: user.username.clone(),
        original_username: original_username.clone(),
        is_admin: is_admin_user,
        user_id: user.id,
    });

    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(state.sessions.ttl())
        .build();

    info!(user_id = user.id, username = %user.username, is_admin_user, "login successful");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Login successful",
            session_id,
            user: LoginUser {
                id: user.id,
                username: user.username,
                original_username,
                role: user.role,
                is_admin_user,
            },
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, ApiError> {
    match session_from_jar(&state, &jar) {
        Some(session) => Ok(Json(SessionResponse {
            success: true,
            session,
        })),
        None => Err(ApiError::Unauthorized("No active session")),
    }
}

/// Clears session state unconditionally; succeeds even with no session.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        state.sessions.remove(id);
    }
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logged out successfully",
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_query_interpolates_both_fields_verbatim() {
        let q = login_query("admin", "admin123");
        assert_eq!(
            q,
            "SELECT id, username, password, role FROM users WHERE username = 'admin' AND password = 'admin123'"
        );
    }

    #[test]
    fn tautology_password_reaches_the_query_unescaped() {
        let q = login_query("anyone", "' OR '1'='1");
        assert!(q.ends_with("AND password = '' OR '1'='1'"));
    }

    #[test]
    fn login_response_shape() {
        let resp = LoginResponse {
            success: true,
            message: "Login successful",
            session_id: Uuid::nil(),
            user: LoginUser {
                id: 1,
                username: "admin".into(),
                original_username: "admin".into(),
                role: "admin".into(),
                is_admin_user: true,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["user"]["is_admin_user"], true);
        assert_eq!(json["user"]["original_username"], "admin");
        assert_eq!(json["message"], "Login successful");
    }
}
