//! CLI module for shorts-mixer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;
pub mod project;

/// Shorts Mixer
///
/// Mixes 1.5 second clips marked in several source videos into short videos
/// that alternate between sources.
#[derive(Parser, Debug)]
#[command(name = "shortsmix")]
#[command(about = "Shorts Mixer - Alternating short videos from marked clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./shortsmix.toml when present)
    #[arg(long, global = true, env = "SHORTSMIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level, overrides the configuration file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the clip order a generation would use
    Preview(args::PreviewArgs),
    /// Generate short videos from a project
    Generate(args::GenerateArgs),
    /// Print the duration of a media file
    Probe(args::ProbeArgs),
}

pub use args::{GenerateArgs, PreviewArgs, ProbeArgs, ReportFormat};
