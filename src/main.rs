//! Cookoff server entry point: config, stores, kitchen, HTTP.

mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chef_store::{ChefStore, UserStore};
use common::AppConfig;
use kitchen::Kitchen;
use routes::AppState;

#[derive(Parser, Debug)]
#[command(name = "cookoff-server", about = "Chef cookoff game backend")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Validate configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("cookoff_server=info,chef_store=info,kitchen=info")
        }))
        .with_target(true)
        .init();

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check_config {
        info!("Configuration OK");
        return;
    }

    info!("🍳 Cookoff server starting up...");
    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> common::Result<()> {
    let pool = chef_store::connect(&config.database_path).await?;

    let chefs = ChefStore::new(pool.clone());
    chefs.init_schema().await?;
    let users = UserStore::new(pool);
    users.init_schema().await?;

    let kitchen = Kitchen::new(chefs.clone(), &config);
    let state = Arc::new(AppState {
        kitchen,
        chefs,
        users,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Cookoff server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
