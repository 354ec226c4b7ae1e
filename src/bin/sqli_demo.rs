use sqlilab::exploit::{ExploitClient, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let client = ExploitClient::new(base_url)?;
    client.run().await
}
