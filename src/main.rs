use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use petpost::{build_state, config::Config, create_router, utils::init_logger};

/// Pet adoption listing service
#[derive(Debug, Parser)]
#[command(name = "petpost", version, about)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding pets.json (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn override_for(&self, key: &str) -> Option<String> {
        match key {
            "HOST" => self.host.clone(),
            "PORT" => self.port.map(|p| p.to_string()),
            "DATA_DIR" => self.data_dir.as_ref().map(|d| d.display().to_string()),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env_with(|key| args.override_for(key))?;

    // Initialize tracing
    let _log_guard = init_logger(&config.logging);
    info!("Configuration loaded: {:?}", config.server);
    info!("Storage: {:?}", config.storage);
    info!(path = %config.data.document_path().display(), "Listing document");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    // Create shared state
    let state = build_state(config)?;

    // Create router
    let app = create_router(state);

    // Start server
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
