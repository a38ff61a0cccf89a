use std::sync::Arc;
use stock_market_chatbot::{send_message, ChatHistory, Gateway, GatewayConfig, HuggingFaceClient};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Quiet by default so log lines don't interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GatewayConfig::from_env()?;
    if config.api_token.is_none() {
        warn!("API_TOKEN not set; inference requests will be sent unauthenticated");
    }

    let gateway = Gateway::new(Arc::new(HuggingFaceClient::new(&config)?));
    info!(?config, "Chat session starting");

    println!("📈 Stock Market Chatbot");
    println!("Ask me anything about stock markets!");
    println!("(/history shows the conversation, /clear starts over, /quit exits)\n");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history = ChatHistory::new();

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/history" => {
                if history.is_empty() {
                    println!("(no messages yet)");
                } else {
                    println!("{}", history.transcript());
                }
                continue;
            }
            "/clear" => {
                history = ChatHistory::new();
                println!("(conversation cleared)");
                continue;
            }
            "" => continue,
            _ => {}
        }

        println!("Thinking...");
        let outcome = send_message(&gateway, history, &line).await;
        history = outcome.history;

        if let Some(reply) = history.last() {
            println!("Bot: {}\n", reply.text);
        }
    }

    Ok(())
}
