use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetr::config::{self, Config};
use assetr::notifications::Mailer;
use assetr::AppState;

#[derive(Parser, Debug)]
#[command(name = "assetr")]
#[command(author, version, about = "IT asset and support ticket backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "assetr.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting assetr v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.token_secret == config::DEFAULT_TOKEN_SECRET {
        tracing::warn!(
            "Using the built-in development token secret; set ASSETR_TOKEN_SECRET in production"
        );
    }

    // Ensure data directory exists
    std::fs::create_dir_all(&config.server.data_dir)?;

    // Initialize database. Fatal on failure: the service must not come up
    // without one.
    let db = assetr::db::init(&config.server.data_dir).await?;

    let mailer = Mailer::new(config.email.clone());
    if !mailer.is_enabled() {
        tracing::warn!("SMTP not configured; ticket notifications will be skipped");
    }

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), db.clone(), mailer));
    let app = assetr::api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Allowed frontend origin: {}", config.cors.frontend_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the pool before exit.
    db.close().await;
    tracing::info!("Database connection closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
