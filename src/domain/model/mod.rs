// Domain models - Core types and data structures

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, EncodeError};

/// Length of every marked clip, in seconds
pub const CLIP_DURATION: f64 = 1.5;

/// Fewest source videos a batch may contain
pub const MIN_SOURCES: usize = 3;

/// Most source videos a batch may contain
pub const MAX_SOURCES: usize = 5;

/// Most outputs a single generation run may request
pub const MAX_OUTPUT_COUNT: u32 = 10;

/// Labels handed out to sources in upload order
pub const SOURCE_LABELS: [&str; MAX_SOURCES] = ["a", "b", "c", "d", "e"];

/// Slack allowed when comparing clip ranges against source durations
const TIME_EPSILON: f64 = 1e-9;

/// Display color for a source label; unknown labels fall back to gray
pub fn source_color(source_id: &str) -> &'static str {
    match source_id {
        "a" => "#3B82F6",
        "b" => "#10B981",
        "c" => "#F59E0B",
        "d" => "#EF4444",
        "e" => "#8B5CF6",
        _ => "#6B7280",
    }
}

/// One uploaded full-length video contributing clips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVideo {
    pub id: String,
    pub path: PathBuf,
    pub name: String,
    pub duration: f64,
}

impl SourceVideo {
    /// Create a source video with validation
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        duration: f64,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let path = path.into();

        if id.trim().is_empty() {
            return Err(DomainError::BadArgs("Source id cannot be empty".to_string()));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Source {} has invalid duration {}",
                id, duration
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| id.clone());

        Ok(Self {
            id,
            path,
            name,
            duration,
        })
    }

    /// Display color derived from the source label
    pub fn color(&self) -> &'static str {
        source_color(&self.id)
    }
}

/// Fixed-length sub-range of exactly one source video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub source_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub color: String,
}

impl Clip {
    /// Mark a clip at `start_time` within `source`; `sequence` numbers clips per source from 1
    pub fn new(source: &SourceVideo, sequence: u32, start_time: f64) -> Result<Self, DomainError> {
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(DomainError::InvalidClip(format!(
                "start time {} must be a non-negative number",
                start_time
            )));
        }

        let clip = Self {
            id: format!("{}{}", source.id, sequence),
            source_id: source.id.clone(),
            start_time,
            end_time: start_time + CLIP_DURATION,
            duration: CLIP_DURATION,
            color: source.color().to_string(),
        };

        if !clip.fits_within(source.duration) {
            return Err(DomainError::InvalidClip(format!(
                "clip {} ends at {:.3}s but source {} is only {:.3}s long",
                clip.id, clip.end_time, source.id, source.duration
            )));
        }

        Ok(clip)
    }

    /// Check that the clip's time range lies inside a source of the given duration
    pub fn fits_within(&self, source_duration: f64) -> bool {
        self.start_time >= 0.0
            && self.end_time >= self.start_time
            && self.end_time <= source_duration + TIME_EPSILON
    }

    /// Upper-case badge label, e.g. "A1"
    pub fn label(&self) -> String {
        self.id.to_uppercase()
    }
}

/// Allowed output lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TargetDuration {
    Seconds15,
    Seconds30,
    Seconds45,
    Seconds60,
}

impl TargetDuration {
    pub const ALL: [TargetDuration; 4] = [
        TargetDuration::Seconds15,
        TargetDuration::Seconds30,
        TargetDuration::Seconds45,
        TargetDuration::Seconds60,
    ];

    pub fn seconds(self) -> u32 {
        match self {
            TargetDuration::Seconds15 => 15,
            TargetDuration::Seconds30 => 30,
            TargetDuration::Seconds45 => 45,
            TargetDuration::Seconds60 => 60,
        }
    }

    pub fn as_secs_f64(self) -> f64 {
        self.seconds() as f64
    }
}

impl TryFrom<u32> for TargetDuration {
    type Error = DomainError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        TargetDuration::ALL
            .into_iter()
            .find(|t| t.seconds() == seconds)
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Invalid target duration: {}. Valid values: 15, 30, 45, 60",
                    seconds
                ))
            })
    }
}

impl From<TargetDuration> for u32 {
    fn from(target: TargetDuration) -> Self {
        target.seconds()
    }
}

impl fmt::Display for TargetDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp4,
    Webm,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn parse(format_str: &str) -> Result<Self, DomainError> {
        match format_str.trim().to_lowercase().as_str() {
            "mp4" => Ok(OutputFormat::Mp4),
            "webm" => Ok(OutputFormat::Webm),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid output format: {}. Valid formats: mp4, webm",
                format_str
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Webm => "webm",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub target_duration: TargetDuration,
    pub count: u32,
    pub format: OutputFormat,
}

impl GenerationSettings {
    /// Create generation settings with validation
    pub fn new(
        target_duration: TargetDuration,
        count: u32,
        format: OutputFormat,
    ) -> Result<Self, DomainError> {
        if count == 0 || count > MAX_OUTPUT_COUNT {
            return Err(DomainError::BadArgs(format!(
                "Output count must be between 1 and {}, got {}",
                MAX_OUTPUT_COUNT, count
            )));
        }

        Ok(Self {
            target_duration,
            count,
            format,
        })
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            target_duration: TargetDuration::Seconds30,
            count: 3,
            format: OutputFormat::Mp4,
        }
    }
}

/// Standalone clip produced by the encoder's extract step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedClip {
    pub clip_id: String,
    pub path: PathBuf,
}

/// Finished media produced by the encoder's concatenate step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// None when nothing was written (dry runs)
    pub size_bytes: Option<u64>,
}

/// Success or failure of one output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutputOutcome {
    Success { media: MediaHandle },
    Failed { error: EncodeError },
}

/// Result of one generation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedOutput {
    pub id: String,
    pub index: usize,
    pub clips: Vec<Clip>,
    pub actual_duration: f64,
    pub filename: String,
    pub outcome: OutputOutcome,
}

impl GeneratedOutput {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, OutputOutcome::Success { .. })
    }

    pub fn media(&self) -> Option<&MediaHandle> {
        match &self.outcome {
            OutputOutcome::Success { media } => Some(media),
            OutputOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&EncodeError> {
        match &self.outcome {
            OutputOutcome::Success { .. } => None,
            OutputOutcome::Failed { error } => Some(error),
        }
    }

    /// Clip ids in output order
    pub fn clip_ids(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Batch of 3 to 5 uploaded sources for one editing session
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLibrary {
    sources: Vec<SourceVideo>,
}

impl SourceLibrary {
    /// Create a library from already-labeled sources
    pub fn new(sources: Vec<SourceVideo>) -> Result<Self, DomainError> {
        if sources.len() < MIN_SOURCES || sources.len() > MAX_SOURCES {
            return Err(DomainError::BadArgs(format!(
                "Between {} and {} source videos are required, got {}",
                MIN_SOURCES,
                MAX_SOURCES,
                sources.len()
            )));
        }

        for (i, source) in sources.iter().enumerate() {
            if sources[..i].iter().any(|s| s.id == source.id) {
                return Err(DomainError::BadArgs(format!(
                    "Duplicate source id: {}",
                    source.id
                )));
            }
        }

        Ok(Self { sources })
    }

    /// Label media files `a`..`e` in the given order
    pub fn from_media<P: AsRef<Path>>(media: &[(P, f64)]) -> Result<Self, DomainError> {
        if media.len() > MAX_SOURCES {
            return Err(DomainError::BadArgs(format!(
                "At most {} source videos are supported, got {}",
                MAX_SOURCES,
                media.len()
            )));
        }

        let sources = media
            .iter()
            .zip(SOURCE_LABELS)
            .map(|((path, duration), label)| {
                SourceVideo::new(label, path.as_ref().to_path_buf(), *duration)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(sources)
    }

    pub fn get(&self, id: &str) -> Option<&SourceVideo> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn sources(&self) -> &[SourceVideo] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// The active set of marked clips
#[derive(Debug, Clone, Default)]
pub struct ClipPool {
    clips: Vec<Clip>,
    next_sequence: HashMap<String, u32>,
}

impl ClipPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new clip starting at `start_time` in `source`
    ///
    /// Sequence numbers are never reused within a source, so removing `a1` and
    /// adding another clip yields `a3` rather than a second `a2`.
    pub fn add_clip(&mut self, source: &SourceVideo, start_time: f64) -> Result<&Clip, DomainError> {
        let sequence = self.next_sequence.get(&source.id).copied().unwrap_or(1);
        let clip = Clip::new(source, sequence, start_time)?;

        self.next_sequence.insert(source.id.clone(), sequence + 1);
        self.clips.push(clip);

        let last = self.clips.len() - 1;
        Ok(&self.clips[last])
    }

    /// Remove a clip by id, returning it if it was present
    pub fn remove_clip(&mut self, clip_id: &str) -> Option<Clip> {
        let position = self.clips.iter().position(|c| c.id == clip_id)?;
        Some(self.clips.remove(position))
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Totals shown next to the clip list
    pub fn summary(&self) -> PoolSummary {
        let mut per_source = BTreeMap::new();
        for clip in &self.clips {
            *per_source.entry(clip.source_id.clone()).or_insert(0) += 1;
        }

        PoolSummary {
            total_clips: self.clips.len(),
            total_seconds: self.clips.iter().map(|c| c.duration).sum(),
            per_source,
        }
    }
}

/// Clip counts for a pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSummary {
    pub total_clips: usize,
    pub total_seconds: f64,
    pub per_source: BTreeMap<String, usize>,
}
