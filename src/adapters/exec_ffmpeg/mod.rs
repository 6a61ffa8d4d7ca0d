//! FFmpeg execution adapter
//!
//! Drives the `ffmpeg` command line tool. Extracted clips live in a private
//! scratch directory that is removed when the adapter is dropped.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::EncoderConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Lines of ffmpeg stderr kept in error messages
const STDERR_TAIL_LINES: usize = 6;

struct ScratchSpace {
    dir: TempDir,
    next_id: u64,
}

/// FFmpeg-based encoder
///
/// Every ffmpeg invocation holds the scratch lock, so calls through one
/// instance never overlap even when several runs share it.
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    video_codec: String,
    audio_codec: String,
    preset: String,
    crf: u8,
    output_dir: PathBuf,
    scratch: Mutex<ScratchSpace>,
}

impl FfmpegEncoder {
    /// Create new encoder writing finished outputs to `output_dir`
    pub fn new(config: &EncoderConfig, output_dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("shortsmix-");
        let dir = match &config.scratch_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| DomainError::FsFail(format!("Cannot create scratch directory: {}", e)))?;

        debug!("Encoder scratch directory: {}", dir.path().display());

        Ok(Self {
            ffmpeg: config.ffmpeg_path.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            preset: config.preset.clone(),
            crf: config.crf,
            output_dir: output_dir.into(),
            scratch: Mutex::new(ScratchSpace { dir, next_id: 0 }),
        })
    }

    /// Arguments that cut `clip` out of `source` into `output`
    ///
    /// Clips are always re-encoded to H.264/AAC MP4 so the concat step can
    /// join them without caring about the source codecs.
    pub fn extract_args(&self, source: &SourceVideo, clip: &Clip, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-ss".into(),
            format!("{:.3}", clip.start_time).into(),
            "-i".into(),
            source.path.clone().into_os_string(),
            "-t".into(),
            format!("{:.3}", clip.duration).into(),
            "-c:v".into(),
            self.video_codec.clone().into(),
        ];
        if !self.preset.is_empty() {
            args.push("-preset".into());
            args.push(self.preset.clone().into());
        }
        args.extend([
            "-crf".into(),
            self.crf.to_string().into(),
            "-c:a".into(),
            self.audio_codec.clone().into(),
            "-avoid_negative_ts".into(),
            "make_zero".into(),
            "-y".into(),
            output.as_os_str().to_owned(),
        ]);
        args
    }

    /// Arguments that join the clips listed in `list` into `output`
    pub fn concat_args(&self, list: &Path, format: OutputFormat, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list.as_os_str().to_owned(),
        ];
        match format {
            OutputFormat::Mp4 => {
                args.extend(["-c".into(), "copy".into()]);
            }
            // Intermediate clips are H.264/AAC, which WebM cannot carry
            OutputFormat::Webm => {
                args.extend([
                    "-c:v".into(),
                    "libvpx-vp9".into(),
                    "-crf".into(),
                    self.crf.to_string().into(),
                    "-b:v".into(),
                    "0".into(),
                    "-c:a".into(),
                    "libopus".into(),
                ]);
            }
        }
        args.extend(["-y".into(), output.as_os_str().to_owned()]);
        args
    }

    async fn run(&self, args: &[OsString]) -> Result<(), String> {
        debug!("Running {} {:?}", self.ffmpeg.display(), args);

        let output = Command::new(&self.ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.ffmpeg.display(), e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr_tail(&stderr, STDERR_TAIL_LINES)
        ))
    }
}

#[async_trait]
impl EncoderPort for FfmpegEncoder {
    async fn extract(&self, source: &SourceVideo, clip: &Clip) -> Result<EncodedClip, EncodeError> {
        let mut scratch = self.scratch.lock().await;
        scratch.next_id += 1;
        let path = scratch
            .dir
            .path()
            .join(format!("clip_{:04}_{}.mp4", scratch.next_id, clip.id));

        let args = self.extract_args(source, clip, &path);
        if let Err(message) = self.run(&args).await {
            remove_quietly(&path).await;
            return Err(EncodeError::extract(format!("clip {}: {}", clip.id, message)));
        }

        debug!("Extracted {} to {}", clip.id, path.display());
        Ok(EncodedClip {
            clip_id: clip.id.clone(),
            path,
        })
    }

    async fn concatenate(
        &self,
        clips: &[EncodedClip],
        format: OutputFormat,
        file_name: &str,
    ) -> Result<MediaHandle, EncodeError> {
        let mut scratch = self.scratch.lock().await;
        let result = self.concatenate_locked(&mut scratch, clips, format, file_name).await;

        for clip in clips {
            remove_quietly(&clip.path).await;
        }
        result
    }

    async fn discard(&self, clips: Vec<EncodedClip>) {
        let _scratch = self.scratch.lock().await;
        for clip in &clips {
            remove_quietly(&clip.path).await;
        }
        debug!("Discarded {} extracted clip(s)", clips.len());
    }

    /// Check that the configured ffmpeg binary runs
    async fn check_available(&self) -> Result<(), DomainError> {
        let output = Command::new(&self.ffmpeg)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ConfigFail(format!("Failed to run {}: {}", self.ffmpeg.display(), e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ConfigFail(format!(
                "{} exists but returned non-zero on -version",
                self.ffmpeg.display()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

impl FfmpegEncoder {
    async fn concatenate_locked(
        &self,
        scratch: &mut ScratchSpace,
        clips: &[EncodedClip],
        format: OutputFormat,
        file_name: &str,
    ) -> Result<MediaHandle, EncodeError> {
        if clips.is_empty() {
            return Err(EncodeError::concatenate("no clips to concatenate"));
        }
        if let Some(missing) = clips.iter().find(|c| !c.path.is_file()) {
            return Err(EncodeError::concatenate(format!(
                "extracted clip {} is no longer available",
                missing.clip_id
            )));
        }

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            EncodeError::concatenate(format!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        scratch.next_id += 1;
        let list = scratch.dir.path().join(format!("concat_{:04}.txt", scratch.next_id));
        tokio::fs::write(&list, concat_list(clips))
            .await
            .map_err(|e| EncodeError::concatenate(format!("cannot write concat list: {}", e)))?;

        let output = self.output_dir.join(file_name);
        let existed = output.exists();
        if existed {
            warn!("Overwriting existing output {}", output.display());
        }

        let result = self.run(&self.concat_args(&list, format, &output)).await;
        remove_quietly(&list).await;

        if let Err(message) = result {
            // A file from an earlier run is left alone unless ffmpeg got to truncate it
            if !existed {
                remove_quietly(&output).await;
            }
            return Err(EncodeError::concatenate(message));
        }

        let size_bytes = tokio::fs::metadata(&output).await.ok().map(|m| m.len());
        info!("Wrote {} from {} clips", output.display(), clips.len());

        Ok(MediaHandle {
            path: output,
            format,
            size_bytes,
        })
    }
}

/// Body of a concat demuxer list file, one `file '...'` line per clip
pub fn concat_list(clips: &[EncodedClip]) -> String {
    clips
        .iter()
        .map(|c| format!("file '{}'\n", escape_concat_path(&c.path)))
        .collect()
}

/// Quote-escape a path for the concat demuxer
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}

fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
