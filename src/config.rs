use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

impl DbConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub database_url: Option<String>,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "db".into()),
            name: std::env::var("DB_NAME").unwrap_or_else(|_| "sqlinjection_db".into()),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".into()),
            password: std::env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".into()),
            port: std::env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5432),
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        Ok(Self {
            db,
            database_url,
            session_ttl_hours,
        })
    }

    /// DATABASE_URL overrides the individual DB_* parts when set.
    pub fn connection_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| self.db.url())
    }
}
