use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `username` is the unauthenticated fallback for callers without a session
/// cookie (the demo client uses it); `q` is the raw search term.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams {
    pub username: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Computer {
    pub id: i32,
    pub computer_name: String,
    pub ip_address: String,
}

#[derive(Debug, Serialize)]
pub struct ComputersResponse {
    pub success: bool,
    pub computers: Vec<Computer>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<serde_json::Value>,
}
