mod app;
mod cli;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{prelude::*, EnvFilter};
use wurld_core::config::{self, ConfigStore};

fn main() -> Result<()> {
    init_logging()?;
    let cli = cli::Cli::parse();

    let store = ConfigStore::new(ConfigStore::default_path());
    let (mut settings, mut registry) = match store.load() {
        Ok(Some(state)) => state,
        Ok(None) => config::default_state(),
        Err(err) => {
            warn!(%err, "unreadable config, starting from defaults");
            config::default_state()
        }
    };

    // Startup mutations persist immediately, before the interactive loop.
    if cli::apply(&cli, &mut settings, &mut registry) {
        if let Err(err) = store.save(&settings, &registry) {
            warn!(%err, "failed to persist startup changes");
        }
    }

    let mut app = app::App::new(store, settings, registry);
    app.run()
}

fn init_logging() -> Result<()> {
    let log_dir = dirs::state_dir()
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wurld");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("wurld.log");

    let env_filter = EnvFilter::from_default_env();

    // File output only; a stdout layer would write over the raw-mode screen.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
