// Domain rules - Business logic and policies

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::NaiveDate;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Orders clips so that no two neighbours come from the same source video
///
/// Round-robin over per-source queues with the source list rotated after every
/// placement. Deterministic for a given input order.
pub struct ClipSequencer;

impl ClipSequencer {
    /// Reorder `clips` so adjacent clips have different sources whenever possible
    ///
    /// The result is a permutation of the input. With a single active source the
    /// adjacency rule cannot hold and that source's clips keep their original order.
    pub fn shuffle(clips: &[Clip]) -> Vec<Clip> {
        if clips.is_empty() {
            return Vec::new();
        }

        let mut order: VecDeque<&str> = VecDeque::new();
        let mut queues: HashMap<&str, VecDeque<&Clip>> = HashMap::new();
        for clip in clips {
            let queue = queues.entry(clip.source_id.as_str()).or_insert_with(|| {
                order.push_back(clip.source_id.as_str());
                VecDeque::new()
            });
            queue.push_back(clip);
        }

        let mut result = Vec::with_capacity(clips.len());
        let mut last_source: Option<&str> = None;

        while result.len() < clips.len() {
            let preferred = order
                .iter()
                .copied()
                .find(|id| Some(*id) != last_source && !queues[id].is_empty());
            // Fewer than two active sources left
            let fallback = || order.iter().copied().find(|id| !queues[id].is_empty());

            let Some(source_id) = preferred.or_else(fallback) else {
                break;
            };

            if let Some(clip) = queues.get_mut(source_id).and_then(|q| q.pop_front()) {
                result.push(clip.clone());
                last_source = Some(source_id);
            }

            order.rotate_left(1);
        }

        result
    }

    /// True iff no two adjacent clips share a source
    pub fn is_valid_sequence(clips: &[Clip]) -> bool {
        clips
            .windows(2)
            .all(|pair| pair[0].source_id != pair[1].source_id)
    }
}

/// Run-level policies for a generation request
pub struct GenerationRules;

impl GenerationRules {
    /// Clips one output needs to reach the target duration
    pub fn clips_needed(target: TargetDuration) -> usize {
        (target.as_secs_f64() / CLIP_DURATION).ceil() as usize
    }

    /// Number of distinct source ids referenced by the pool
    pub fn distinct_sources(clips: &[Clip]) -> usize {
        clips
            .iter()
            .map(|c| c.source_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Check that a pool can feed a run at the given settings
    pub fn check_preconditions(
        clips: &[Clip],
        settings: &GenerationSettings,
    ) -> Result<(), DomainError> {
        if settings.count == 0 || settings.count > MAX_OUTPUT_COUNT {
            return Err(DomainError::BadArgs(format!(
                "Output count must be between 1 and {}, got {}",
                MAX_OUTPUT_COUNT, settings.count
            )));
        }

        let found = Self::distinct_sources(clips);
        if clips.len() < 2 || found < 2 {
            return Err(DomainError::InsufficientSources { found });
        }

        let required = Self::clips_needed(settings.target_duration);
        if clips.len() < required {
            return Err(DomainError::InsufficientClips {
                required,
                available: clips.len(),
            });
        }

        Ok(())
    }

    /// Prefix of a freshly shuffled pool used for one output
    pub fn select_for_output(shuffled: &[Clip], target: TargetDuration) -> Vec<Clip> {
        let needed = Self::clips_needed(target).min(shuffled.len());
        shuffled[..needed].to_vec()
    }

    /// Sum of clip durations
    pub fn total_duration(clips: &[Clip]) -> f64 {
        clips.iter().map(|c| c.duration).sum()
    }

    /// Check a clip against its source before any encoder work
    pub fn validate_clip<'a>(
        clip: &Clip,
        sources: &'a [SourceVideo],
    ) -> Result<&'a SourceVideo, EncodeError> {
        let source = sources
            .iter()
            .find(|s| s.id == clip.source_id)
            .ok_or_else(|| {
                EncodeError::invalid_input(format!(
                    "clip {} references unknown source {}",
                    clip.id, clip.source_id
                ))
            })?;

        if !clip.fits_within(source.duration) {
            return Err(EncodeError::invalid_input(format!(
                "clip {} ({:.3}s-{:.3}s) exceeds source {} duration {:.3}s",
                clip.id, clip.start_time, clip.end_time, source.id, source.duration
            )));
        }

        Ok(source)
    }
}

/// Naming policy for generated outputs
pub struct OutputNaming;

impl OutputNaming {
    /// `shorts_{NN}_{seconds}s_{YYYYMMDD}.{ext}` with `index` counted from zero
    pub fn filename(
        index: usize,
        actual_duration: f64,
        date: NaiveDate,
        format: OutputFormat,
    ) -> String {
        format!(
            "shorts_{:02}_{}s_{}.{}",
            index + 1,
            actual_duration.round() as u64,
            date.format("%Y%m%d"),
            format.extension()
        )
    }

    /// Stable output id, `gen_{index+1}`
    pub fn output_id(index: usize) -> String {
        format!("gen_{}", index + 1)
    }
}

#[cfg(test)]
mod tests;
