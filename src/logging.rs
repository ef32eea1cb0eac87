//! Logging configuration using tracing
//!
//! The terminal belongs to the UI, so everything goes to a daily log file under
//! `{data_local_dir}/cmapi-playground/logs/`. The level is controlled by the
//! `CMAPI_PLAYGROUND_LOG` environment variable:
//!
//! ```bash
//! CMAPI_PLAYGROUND_LOG=debug cmapi-playground
//! ```

use crate::config::APP_DIR;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "cmapi-playground.log";

pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let env_filter = EnvFilter::try_from_env("CMAPI_PLAYGROUND_LOG")
        .unwrap_or_else(|_| EnvFilter::new("cmapi_playground=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("cmapi-playground starting, logging to {}", log_dir.display());

    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR).join("logs")
}
