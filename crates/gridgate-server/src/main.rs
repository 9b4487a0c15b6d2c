//! Gridgate portal server binary.

mod auth;
mod error;
mod handlers;
mod pages;
mod routes;
mod state;
mod templates;
mod users;

use clap::Parser;
use gridgate_core::GridgateConfig;
use gridgate_sync::SyncClient;
use gridgate_token::TokenSigner;
use state::AppState;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gridgate-server", about = "Auth-gated widget portal")]
struct Args {
    /// Path to the config file (defaults to gridgate.toml).
    #[arg(long, env = "GRIDGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => gridgate_core::config::load_config_from(path)?,
        None => gridgate_core::load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "no config file loaded, using defaults");
            GridgateConfig::default()
        }),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    // Both the widget page and the sync call need the shared secret;
    // fail startup rather than discovering it on the first request.
    let secret = config.widget.resolve_shared_secret().unwrap_or_default();
    let signer = TokenSigner::new(&secret)?;

    let sync = if config.sync.enabled {
        Some(SyncClient::from_config(&config)?)
    } else {
        tracing::info!("external user sync is disabled");
        None
    };

    let bind = config.server.bind.clone();
    let state = AppState::new(config, signer, sync);
    let app = routes::router(state);

    tracing::info!(address = %bind, "gridgate portal listening");
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
