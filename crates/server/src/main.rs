use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before config so local development keys are picked up.
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::start_server(config).await
}
