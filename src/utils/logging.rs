use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use color_eyre::{Result, eyre::Context};
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::PROJECT_NAME;

lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Open the log file for appending, so short commands such as `list` keep
/// what an earlier session wrote.
fn open_log_file(data_dir: &Path) -> Result<File> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE.clone());
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))
}

/// Send `tracing` events to `<data_dir>/design_kit.log`.
///
/// The filter comes from `RUST_LOG`, then `DESIGN_KIT_LOG_LEVEL`, and
/// defaults to `info`. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr.
pub fn init(data_dir: &Path) -> Result<()> {
    let log_file = open_log_file(data_dir)?;

    let env_filter = EnvFilter::builder().with_default_directive(tracing::Level::INFO.into());
    // RUST_LOG wins over the app specific variable
    let env_filter = env_filter
        .try_from_env()
        .or_else(|_| env_filter.with_env_var(LOG_ENV.clone()).from_env())?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
