use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use chat_widget::{ChatService, HttpTransport, SendOutcome, WidgetConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = WidgetConfig::from_env().context("invalid widget configuration")?;
    let transport = HttpTransport::new(&config.base_url)?;
    info!("Chat endpoint: {}", transport.endpoint());

    let service = ChatService::new(transport, &config);
    service.toggle();

    println!("{}", config.greeting);
    println!("{}", config.prompt);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match line.trim() {
            "/quit" => break,
            "/retry" => service.retry().await,
            _ => service.send(line).await,
        };

        match outcome {
            Some(SendOutcome::Replied) => {
                if let Some(reply) = service.snapshot().messages().last() {
                    println!("{}\n", reply.text);
                }
            }
            Some(SendOutcome::Failed(_)) => println!("(sin respuesta, escribe /retry para reintentar)\n"),
            Some(SendOutcome::Held | SendOutcome::Stale) | None => {}
        }
    }

    Ok(())
}
