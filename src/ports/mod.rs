// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the external video encoder
///
/// Implementations own a private scratch area and are not safe to drive
/// concurrently: callers must have at most one `extract`/`concatenate` call in
/// flight per encoder instance. Handles returned by `extract` stay valid until
/// they are passed to `concatenate` or `discard`.
#[async_trait]
pub trait EncoderPort: Send + Sync {
    /// Cut `clip`'s range out of `source` into a standalone clip
    async fn extract(&self, source: &SourceVideo, clip: &Clip) -> Result<EncodedClip, EncodeError>;

    /// Join extracted clips, in order, into one output named `file_name`
    ///
    /// The input clips are released when the call returns, whether or not it succeeded.
    async fn concatenate(
        &self,
        clips: &[EncodedClip],
        format: OutputFormat,
        file_name: &str,
    ) -> Result<MediaHandle, EncodeError>;

    /// Release clips extracted for an output that will not be concatenated
    async fn discard(&self, _clips: Vec<EncodedClip>) {}

    /// Check that the encoder can run at all, before a run starts
    async fn check_available(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration of a media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}

/// Where a generation run currently is within one output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
pub enum ProgressStage {
    /// Output selected, encoder work about to begin
    Starting,
    /// Extracting clip `clip` (1-based) of `of`
    Extracting { clip: usize, of: usize },
    /// All `clips` extracted, concatenation about to begin
    Merging { clips: usize },
}

/// One progress notification; purely informational
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Zero-based output index
    pub output: usize,
    pub output_count: usize,
    #[serde(flatten)]
    pub stage: ProgressStage,
}

impl ProgressEvent {
    pub fn new(output: usize, output_count: usize, stage: ProgressStage) -> Self {
        Self {
            output,
            output_count,
            stage,
        }
    }

    /// Overall run progress, 0-100
    pub fn percent(&self) -> u8 {
        if self.output_count == 0 {
            return 0;
        }

        let within_output = match self.stage {
            ProgressStage::Starting => 0.0,
            ProgressStage::Extracting { clip, of } => clip.saturating_sub(1) as f64 / (of + 1) as f64,
            ProgressStage::Merging { clips } => clips as f64 / (clips + 1) as f64,
        };

        let overall = (self.output as f64 + within_output) / self.output_count as f64;
        (overall * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Human-readable status line
    pub fn message(&self) -> String {
        match self.stage {
            ProgressStage::Starting => format!(
                "Generating video {}/{}...",
                self.output + 1,
                self.output_count
            ),
            ProgressStage::Extracting { clip, of } => {
                format!("Extracting clip {}/{}...", clip, of)
            }
            ProgressStage::Merging { .. } => "Merging clips...".to_string(),
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Port for progress reporting to the caller
pub trait ProgressPort: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Progress sink that drops every event
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

impl<F> ProgressPort for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}
