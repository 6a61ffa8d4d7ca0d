//! FFprobe adapter for media file probing

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    ffprobe: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        if !file_path.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file not found: {}",
                file_path.display()
            )));
        }

        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!("failed to run {}: {}", self.ffprobe.display(), e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "{} could not read {}",
                self.ffprobe.display(),
                file_path.display()
            )));
        }

        let duration = parse_duration(&output.stdout)?;
        debug!("Probed {}: {:.3}s", file_path.display(), duration);
        Ok(duration)
    }
}

/// Pull `format.duration` out of ffprobe's JSON output
pub fn parse_duration(stdout: &[u8]) -> Result<f64, DomainError> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| DomainError::ProbeFail(format!("unreadable ffprobe output: {}", e)))?;

    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| DomainError::ProbeFail("ffprobe reported no duration".to_string()))?;

    match raw.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => Ok(d),
        _ => Err(DomainError::ProbeFail(format!("invalid duration '{}'", raw))),
    }
}
