use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use sqlx::{postgres::PgRow, Column, Row};
use tracing::{instrument, warn};

use crate::{
    auth::session_from_jar,
    error::ApiError,
    state::AppState,
};

use super::dto::{Computer, ComputersResponse, InventoryParams, SearchResponse};

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/computers", get(list_computers))
        .route("/search", get(search))
}

/// Session identity wins over the query-parameter fallback; both are
/// trimmed before the gate compares them.
fn resolve_acting_username(
    session_username: Option<&str>,
    param_username: Option<&str>,
) -> String {
    session_username
        .or(param_username)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn require_admin(username: &str) -> Result<(), ApiError> {
    if username.is_empty() || username.to_lowercase() != "admin" {
        return Err(ApiError::Forbidden("Admin access required"));
    }
    Ok(())
}

/// Interpolates the search term unescaped into both LIKE predicates.
/// Intentionally injectable: closing the quote and appending a three-column
/// UNION SELECT reads arbitrary tables and catalog views.
fn search_query(term: &str) -> String {
    format!(
        "SELECT id, computer_name, ip_address FROM computers WHERE computer_name LIKE '%{term}%' OR ip_address LIKE '%{term}%'"
    )
}

/// UNION payloads can change a result column's wire type (the `id` column
/// comes back as text when unioned with a cast), so rows are decoded
/// per-column with fallbacks instead of a fixed FromRow struct.
fn row_to_json(row: &PgRow) -> Value {
    let mut obj = serde_json::Map::new();
    for (i, col) in row.columns().iter().enumerate() {
        let value = if let Ok(v) = row.try_get::<Option<i32>, _>(i) {
            v.map(Value::from).unwrap_or(Value::Null)
        } else if let Ok(v) = row.try_get::<Option<i64>, _>(i) {
            v.map(Value::from).unwrap_or(Value::Null)
        } else if let Ok(v) = row.try_get::<Option<String>, _>(i) {
            v.map(Value::from).unwrap_or(Value::Null)
        } else {
            Value::Null
        };
        obj.insert(col.name().to_string(), value);
    }
    Value::Object(obj)
}

#[instrument(skip(state, jar))]
pub async fn list_computers(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<InventoryParams>,
) -> Result<Json<ComputersResponse>, ApiError> {
    let session = session_from_jar(&state, &jar);
    let username = resolve_acting_username(
        session.as_ref().map(|s| s.original_username.as_str()),
        params.username.as_deref(),
    );
    require_admin(&username)?;

    let computers = sqlx::query_as::<_, Computer>(
        "SELECT id, computer_name, ip_address FROM computers ORDER BY id",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ComputersResponse {
        success: true,
        computers,
    }))
}

#[instrument(skip(state, jar))]
pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<InventoryParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let session = session_from_jar(&state, &jar);
    let username = resolve_acting_username(
        session.as_ref().map(|s| s.original_username.as_str()),
        params.username.as_deref(),
    );
    require_admin(&username)?;

    let term = params.q.unwrap_or_default();
    let query = search_query(&term);

    // Errors here echo the raw database message back to the caller via
    // `error_details`. That is the intended disclosure for the exercise.
    let rows = sqlx::query(&query)
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            warn!(error = %e, "search query failed");
            ApiError::verbose(e)
        })?;

    let results = rows.iter().map(row_to_json).collect();

    Ok(Json(SearchResponse {
        success: true,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_identity_wins_over_parameter() {
        let resolved = resolve_acting_username(Some("admin"), Some("user1"));
        assert_eq!(resolved, "admin");
    }

    #[test]
    fn parameter_is_the_fallback_and_is_trimmed() {
        let resolved = resolve_acting_username(None, Some("  admin  "));
        assert_eq!(resolved, "admin");
    }

    #[test]
    fn missing_both_resolves_to_empty() {
        assert_eq!(resolve_acting_username(None, None), "");
    }

    #[test]
    fn gate_accepts_only_literal_admin() {
        assert!(require_admin("admin").is_ok());
        assert!(require_admin("ADMIN").is_ok());
        assert!(require_admin("").is_err());
        assert!(require_admin("user1").is_err());
        assert!(require_admin("admin' --").is_err());
    }

    #[test]
    fn search_query_interpolates_term_unescaped() {
        let q = search_query("SERVER");
        assert_eq!(
            q,
            "SELECT id, computer_name, ip_address FROM computers WHERE computer_name LIKE '%SERVER%' OR ip_address LIKE '%SERVER%'"
        );
    }

    #[test]
    fn union_payload_survives_interpolation() {
        let payload = "' OR '1'='1' UNION SELECT CAST(tablename AS text), null, null FROM pg_tables WHERE schemaname='public' --";
        let q = search_query(payload);
        assert!(q.contains("UNION SELECT CAST(tablename AS text), null, null FROM pg_tables"));
        assert!(q.ends_with(&format!("OR ip_address LIKE '%{payload}%'")));
    }
}
