//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Project file listing sources and clip start times
    #[arg(short, long)]
    pub project: PathBuf,

    /// Target duration in seconds (15, 30, 45 or 60)
    #[arg(short, long)]
    pub target: Option<u32>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project file listing sources and clip start times
    #[arg(short, long)]
    pub project: PathBuf,

    /// Target duration in seconds (15, 30, 45 or 60)
    #[arg(short, long)]
    pub target: Option<u32>,

    /// Number of videos to generate (1-10)
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Output format (mp4 or webm)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Directory for finished videos; same-day reruns overwrite files with the same name
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Plan outputs without running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report in a machine-readable format
    #[arg(long, value_enum)]
    pub report: Option<ReportFormat>,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
}
