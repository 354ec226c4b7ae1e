use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Handler errors rendered as the JSON bodies the frontend and the demo
/// client expect: `{success: false, message: "..."}` plus, for the search
/// endpoint, a raw `error_details` echo of the database error. The echo is
/// an intentional information-disclosure vector for the teaching scenario,
/// not something to sanitize.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Internal(anyhow::Error),

    /// Like `Internal`, but the response leaks the raw error text in a
    /// separate `error_details` field.
    #[error("{0}")]
    InternalVerbose(anyhow::Error),
}

impl ApiError {
    pub fn verbose(err: impl Into<anyhow::Error>) -> Self {
        Self::InternalVerbose(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "message": msg}),
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({"success": false, "message": msg}),
            ),
            ApiError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "message": format!("Error: {err}")}),
            ),
            ApiError::InternalVerbose(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "message": format!("Error: {err}"),
                    "error_details": err.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
