use std::io;
use tracing_subscriber::EnvFilter;
use weaviate_spy::config::{OllamaConfig, WeaviateConfig};
use weaviate_spy::seed;
use weaviate_spy::weaviate::WeaviateClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Confirmation happens before any connection is opened: a declined
    // prompt performs zero database calls.
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    if !seed::confirm_destruction(&mut input, &mut output)? {
        println!("Aborted.");
        return Ok(());
    }

    let client = WeaviateClient::connect(&WeaviateConfig::from_env()).await?;
    seed::run(&client, &OllamaConfig::from_env()).await?;
    Ok(())
}
