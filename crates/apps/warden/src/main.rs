//! Warden - A terminal console for the identity pool backend
//!
//! This is the main entry point for the Warden admin console.

use std::path::PathBuf;

use admin::ConsoleConfig;
use anyhow::{Context, Result};
use log::{error, info};

mod app;
mod input;
mod templates;
mod views;

use app::WardenApp;

/// `--config <file>` replaces the config directory's `warden.json`
fn config_file_arg(args: impl IntoIterator<Item = String>) -> Result<Option<PathBuf>> {
    let mut args = args.into_iter();
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().context("--config needs a file path")?;
                path = Some(PathBuf::from(value));
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }
    Ok(path)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let console_config = match config_file_arg(std::env::args().skip(1))? {
        Some(path) => ConsoleConfig::from_file(&path)
            .with_context(|| format!("Failed to load console configuration from {}", path.display()))?,
        None => ConsoleConfig::load().context("Failed to load console configuration")?,
    };
    info!(
        "Using backend {} (timeout {}s)",
        console_config.base_url, console_config.timeout_secs
    );

    let client = console_config.connect()?;
    let download_dir = std::env::current_dir().context("Could not determine working directory")?;

    WardenApp::new(client, download_dir).run().await
}
