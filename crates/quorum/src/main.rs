//! Process entry point for the Quorum server binary.
//!
//! Binds to `0.0.0.0:$PORT` (default 3000) and runs until terminated.
//! All state lives in process memory for the process lifetime.

use quorum::QuorumServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port =
        std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let server = QuorumServer::builder().bind(&addr).build().await?;
    tracing::info!(%addr, "quorum server listening");

    server.run().await?;
    Ok(())
}
