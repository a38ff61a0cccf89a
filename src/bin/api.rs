use std::sync::Arc;
use stock_market_chatbot::{api::start_server, Gateway, GatewayConfig, HuggingFaceClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    if config.api_token.is_none() {
        warn!("API_TOKEN not set; inference requests will be sent unauthenticated");
    }

    info!("📈 Stock Market Chatbot - API Server");
    info!("📍 Port: {}", config.port);
    info!("🔗 Inference endpoint: {}", config.endpoint_url);

    let client = HuggingFaceClient::new(&config)?;
    let gateway = Gateway::new(Arc::new(client));

    info!("📡 Starting API server...");
    start_server(gateway, config.port).await?;

    Ok(())
}
