mod commands;
mod handlers;
mod http;
mod notifier;
mod render;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelbot_core::{load_config, validate_config, ConfigStore};

use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("REELBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Language: {:?}", config.language);
    info!(
        "Admin configured: {}, friends: {}",
        config.admin_user_id.is_some(),
        config.friend_user_ids.len()
    );

    let bot = if config.telegram.bot_token.is_empty() {
        Bot::from_env()
    } else {
        Bot::new(config.telegram.bot_token.clone())
    };

    let store = Arc::new(ConfigStore::new(config));
    let snapshot = store.snapshot();
    let state = Arc::new(AppState::new(snapshot.clone(), bot.clone()));

    // Health and metrics endpoint, detached from the dispatcher.
    let http_host = snapshot.http.host;
    let http_port = snapshot.http.port;
    tokio::spawn(async move {
        if let Err(e) = http::serve(http_host, http_port).await {
            error!("HTTP endpoint failed: {}", e);
        }
    });

    info!("Starting reelbot v{}", VERSION);
    handlers::run_dispatcher(bot, state).await;

    Ok(())
}
