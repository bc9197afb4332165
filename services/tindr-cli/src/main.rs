//! tindr command-line client
//!
//! Reads the Facebook identity from config/env, opens a session against the
//! Tinder API, then runs one request and logs the result:
//! 1. Load config (`--config`, CONFIG_PATH, or ./tindr.toml)
//! 2. Authenticate with FB_TOKEN / FB_ID
//! 3. Run the chosen command (default: recommendations)

mod command;
mod config;

use anyhow::{Context, Result};
use std::time::Duration;
use tindr::Tindr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::command::{Command, split_args};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (cli_config_path, positionals) = split_args(&args);
    let command = Command::parse(&positionals)?;

    let source = Config::resolve_path(cli_config_path);
    info!(path = %source.path.display(), explicit = source.explicit, "loading configuration");

    let config = Config::load_from(&source)
        .with_context(|| format!("failed to load config from {}", source.path.display()))?;
    let credentials = config
        .credentials()
        .context("no Facebook identity configured")?;

    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        command = command.name(),
        "configuration loaded"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let client = Tindr::with_client(http, &config.api.base_url);

    let auth = client
        .authenticate(credentials.facebook_token.expose(), &credentials.facebook_id)
        .await
        .context("authentication failed")?;
    info!(
        create_date = %auth.get("create_date").unwrap_or(&serde_json::Value::Null),
        "authenticated"
    );

    match command.run(&client).await {
        Ok(data) => {
            info!(command = command.name(), response = %data, "request succeeded");
            Ok(())
        }
        Err(e) => {
            error!(command = command.name(), error = %e, "request failed");
            Err(e).with_context(|| format!("{} request failed", command.name()))
        }
    }
}
