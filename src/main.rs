//! cmapi-playground - a terminal playground for HAL-style REST APIs
//!
//! This is the binary entry point: it reads configuration, sets up logging and
//! hands the terminal to the app loop.

mod actions;
mod app;
mod config;
mod editor;
mod error;
mod format;
mod hal;
mod location;
mod logging;
mod request;
mod state;
mod types;
mod ui;

use app::App;
use clap::Parser;
use color_eyre::Result;
use config::{Config, Overrides, Settings};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use location::Location;
use std::path::PathBuf;

/// Explore an API by following its links
#[derive(Parser, Debug)]
#[command(name = "cmapi-playground", version)]
#[command(about = "A terminal playground for HAL-style REST APIs", long_about = None)]
struct Args {
    /// Organization ID sent as x-gw-ims-org-id
    #[arg(long, env = "CMAPI_ORG_ID")]
    org_id: Option<String>,

    /// Client ID sent as x-api-key
    #[arg(long, env = "CMAPI_CLIENT_ID")]
    client_id: Option<String>,

    /// Bearer access token (never written to disk)
    #[arg(long, env = "CMAPI_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Use the stage environment
    #[arg(long)]
    stage: bool,

    /// Send requests to this host instead of the environment's default
    #[arg(long, value_name = "HOST")]
    endpoint: Option<String>,

    /// Path to request first, instead of the last visited one
    #[arg(long)]
    path: Option<String>,

    /// Config file to use instead of ~/.config/cmapi-playground/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_dir = match logging::init() {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => load_default_config()?,
    };

    let settings = Settings::resolve(
        &config,
        Overrides {
            org_id: args.org_id,
            client_id: args.client_id,
            access_token: args.token,
            stage: args.stage,
            endpoint: args.endpoint,
        },
    )?;
    tracing::info!(endpoint = %settings.endpoint, credentials = ?settings.credentials, "Resolved settings");

    let location = Config::app_dir().ok().map(|dir| Location::in_dir(&dir));
    let initial_path = args
        .path
        .or_else(|| location.as_ref().and_then(Location::read))
        .unwrap_or_else(|| types::DEFAULT_PATH.to_string());

    let app = App::new(settings, initial_path, location, log_dir)?;

    let terminal = ratatui::init();
    // Pastes arrive as one event instead of a burst of key presses
    let _ = crossterm::execute!(std::io::stdout(), EnableBracketedPaste);
    let app_result = app.run(terminal).await;
    let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();
    app_result
}

/// Load the default config, writing one with default values on first run
fn load_default_config() -> Result<Config> {
    let path = Config::config_path()?;
    if path.exists() {
        return Config::load_from(&path);
    }

    let config = Config::default();
    if let Err(e) = config.save_to(&path) {
        tracing::warn!("Could not write default config to {}: {e}", path.display());
    }
    Ok(config)
}
