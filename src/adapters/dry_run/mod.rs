//! Encoder that plans outputs without running ffmpeg

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Produces virtual outputs: paths are computed but nothing is written
pub struct DryRunEncoder {
    output_dir: PathBuf,
    extracted: AtomicU64,
}

impl DryRunEncoder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extracted: AtomicU64::new(0),
        }
    }

    /// Clips "extracted" so far
    pub fn extracted_count(&self) -> u64 {
        self.extracted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EncoderPort for DryRunEncoder {
    async fn extract(&self, source: &SourceVideo, clip: &Clip) -> Result<EncodedClip, EncodeError> {
        let n = self.extracted.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(EncodedClip {
            clip_id: clip.id.clone(),
            path: PathBuf::from(format!("dry-run/clip_{:04}_{}_{}.mp4", n, source.id, clip.id)),
        })
    }

    async fn concatenate(
        &self,
        clips: &[EncodedClip],
        format: OutputFormat,
        file_name: &str,
    ) -> Result<MediaHandle, EncodeError> {
        if clips.is_empty() {
            return Err(EncodeError::concatenate("no clips to concatenate"));
        }

        let path = self.output_dir.join(file_name);
        info!("[dry-run] would write {} from {} clips", path.display(), clips.len());
        Ok(MediaHandle {
            path,
            format,
            size_bytes: None,
        })
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
