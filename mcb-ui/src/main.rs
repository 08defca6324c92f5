//! mcb-ui - Media Catalog Browser user-facing service
//!
//! Aggregates catalog metadata from configured content providers and serves
//! the browsing and search API.

use anyhow::Result;
use clap::Parser;
use mcb_common::config::Config;
use mcb_common::session;
use std::path::PathBuf;
use tracing::info;

use mcb_ui::sources::SourceRegistry;
use mcb_ui::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "mcb-ui", about = "Media Catalog Browser service", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Media Catalog Browser (mcb-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    let shared_secret = match config.auth.shared_secret {
        Some(0) => {
            info!("API authentication disabled (shared_secret = 0)");
            0
        }
        Some(secret) => {
            info!("✓ Loaded shared secret for API authentication");
            secret
        }
        None => {
            info!("No shared secret configured, generated one for this run");
            session::generate_shared_secret()
        }
    };

    let registry = SourceRegistry::from_config(&config.sources);
    info!("✓ Registered {} content sources", registry.len());
    if !config.schedule.is_empty() {
        info!("✓ Loaded {} schedule entries", config.schedule.len());
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, registry, shared_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mcb-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
