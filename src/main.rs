use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use weaviate_spy::api::create_router;
use weaviate_spy::api::handlers::AppState;
use weaviate_spy::config::{self, WeaviateConfig};
use weaviate_spy::weaviate::WeaviateClient;

#[derive(Parser)]
#[command(name = "weaviate-spy", about = "HTTP gateway for a Weaviate vector database")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_GATEWAY_PORT)]
    port: u16,

    /// Directory served as the static frontend
    #[arg(long, default_value = config::DEFAULT_STATIC_DIR)]
    static_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "weaviate_spy=info"
                    .parse()
                    .expect("valid directive literal"),
            ),
        )
        .init();

    let args = Args::parse();

    // One connection attempt; on failure every later request that needs
    // the database answers 503 instead of the process refusing to start.
    let weaviate_config = WeaviateConfig::from_env();
    let weaviate = match WeaviateClient::connect(&weaviate_config).await {
        Ok(client) => {
            tracing::info!("Weaviate connection verified");
            Some(Arc::new(client))
        }
        Err(err) => {
            tracing::error!("Failed to connect to Weaviate: {}", err);
            None
        }
    };

    let app = create_router(AppState { weaviate }, &args.static_dir);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        static_dir = %args.static_dir,
        weaviate = %weaviate_config.rest_url(),
        "weaviate-spy ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Weaviate connection closed");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
