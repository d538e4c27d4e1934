use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Installs the global subscriber.
///
/// The interactive UI owns the terminal, so its logs go to a file; batch
/// runs log to stderr. `RUST_LOG` wins over the `--debug` default.
pub fn init(config: &AppConfig, interactive: bool) -> Result<()> {
    let level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tech_radar_engine={level},tech_radar_tui={level}")));

    let installed = if interactive {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)
            .wrap_err_with(|| format!("Failed to open log file {}", config.log_path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    installed.map_err(|e| eyre!("Failed to install logger: {e}"))
}
