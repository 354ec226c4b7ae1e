use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

const MAX_CONNECT_ATTEMPTS: u32 = 30;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Schema and seed data, every statement idempotent so the bootstrapper can
/// run on every startup: conflict-safe inserts for users/computers, a
/// WHERE NOT EXISTS guard for the single flag row.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(50) UNIQUE NOT NULL,
        password VARCHAR(100) NOT NULL,
        role VARCHAR(20) NOT NULL DEFAULT 'user'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS computers (
        id SERIAL PRIMARY KEY,
        computer_name VARCHAR(100) NOT NULL,
        ip_address VARCHAR(15) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS flag (
        id SERIAL PRIMARY KEY,
        flag VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    INSERT INTO users (username, password, role)
    VALUES
        ('admin', 'admin123', 'admin'),
        ('user1', 'password1', 'user'),
        ('test', 'test123', 'user')
    ON CONFLICT (username) DO NOTHING
    "#,
    r#"
    INSERT INTO computers (computer_name, ip_address)
    SELECT v.computer_name, v.ip_address
    FROM (VALUES
        ('SERVER-01', '192.168.1.10'),
        ('WORKSTATION-05', '192.168.1.25'),
        ('LAPTOP-12', '192.168.1.42'),
        ('SERVER-02', '192.168.1.11'),
        ('WORKSTATION-08', '192.168.1.28'),
        ('LAPTOP-15', '192.168.1.45'),
        ('SERVER-03', '192.168.1.12'),
        ('WORKSTATION-10', '192.168.1.30')
    ) AS v(computer_name, ip_address)
    WHERE NOT EXISTS (SELECT 1 FROM computers)
    "#,
    r#"
    INSERT INTO flag (flag)
    SELECT 'flag{well_done_cafebeef0e4d}'
    WHERE NOT EXISTS (SELECT 1 FROM flag)
    "#,
];

/// Connects to the database, retrying with a fixed one-second backoff while
/// the container is still coming up. Fails fatally after the attempt cap.
pub async fn connect_with_retry(url: &str) -> anyhow::Result<PgPool> {
    let mut attempt = 0u32;
    loop {
        match PgPoolOptions::new().max_connections(10).connect(url).await {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                attempt += 1;
                if attempt >= MAX_CONNECT_ATTEMPTS {
                    return Err(anyhow::anyhow!(
                        "failed to connect to database after {MAX_CONNECT_ATTEMPTS} attempts: {e}"
                    ));
                }
                warn!(
                    error = %e,
                    attempt,
                    max = MAX_CONNECT_ATTEMPTS,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }
    }
}

/// Creates the three tables and seeds the fixed rows. Safe to run twice:
/// reruns leave exactly three users, eight computers and one flag row.
pub async fn init_database(pool: &PgPool) -> anyhow::Result<()> {
    for stmt in SCHEMA_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!("database initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ddl_statement_is_conditional() {
        for stmt in SCHEMA_STATEMENTS.iter().filter(|s| s.contains("CREATE")) {
            assert!(stmt.contains("IF NOT EXISTS"), "unguarded DDL: {stmt}");
        }
    }

    #[test]
    fn seed_inserts_are_idempotent() {
        let users = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("INSERT INTO users"))
            .unwrap();
        assert!(users.contains("ON CONFLICT (username) DO NOTHING"));

        let flag = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("INSERT INTO flag"))
            .unwrap();
        assert!(flag.contains("WHERE NOT EXISTS (SELECT 1 FROM flag)"));

        let computers = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("INSERT INTO computers"))
            .unwrap();
        assert!(computers.contains("WHERE NOT EXISTS (SELECT 1 FROM computers)"));
    }

    #[test]
    fn seeds_match_the_fixed_dataset() {
        let users = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("INSERT INTO users"))
            .unwrap();
        assert!(users.contains("('admin', 'admin123', 'admin')"));
        assert_eq!(users.matches("user'").count(), 2);

        let computers = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("INSERT INTO computers"))
            .unwrap();
        assert_eq!(computers.matches("192.168.1.").count(), 8);
    }
}
