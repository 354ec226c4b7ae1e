use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Session;

/// Request body for login. Both fields are untrusted free text and are
/// interpolated into the credential query verbatim.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User fields returned to the client after login. `original_username` and
/// `is_admin_user` reflect the submitted input, not the matched row.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub username: String,
    pub original_username: String,
    pub role: String,
    pub is_admin_user: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub session_id: Uuid,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}
