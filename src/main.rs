//! Shorts Mixer
//!
//! Mixes fixed-length clips marked in 3 to 5 source videos into short
//! videos that alternate between sources.
//!
//! # Usage
//!
//! ```bash
//! shortsmix preview --project session.toml --target 30
//! shortsmix generate --project session.toml --target 30 --count 3 --format mp4
//! shortsmix probe --input take1.mp4
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use shorts_mixer::cli::{commands, Cli, Commands};
use shorts_mixer::config::AppConfig;
use shorts_mixer::utils::logging::{init_logging, LogLevel};

/// Main entry point for the shortsmix CLI
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    let level = LogLevel::parse(&config.logging.level)?;
    init_logging(level, config.logging.json)?;

    info!("Starting shortsmix {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Preview(args) => commands::preview(args, &config).await,
        Commands::Generate(args) => commands::generate(args, &config).await,
        Commands::Probe(args) => commands::probe(args, &config).await,
    }
}
