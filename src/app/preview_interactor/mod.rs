// Preview interactor - Shows the clip order a generation would use

use serde::Serialize;

use crate::domain::model::*;
use crate::domain::rules::*;

/// Shuffled pool plus the prefix one output would take from it
#[derive(Debug, Clone, Serialize)]
pub struct SequencePreview {
    pub sequence: Vec<Clip>,
    pub selected: Vec<Clip>,
    pub clips_needed: usize,
    /// Clips still missing to fill one output
    pub shortfall: usize,
    pub distinct_sources: usize,
    /// No two adjacent clips share a source
    pub is_valid: bool,
}

/// Interactor for the sequence preview
pub struct PreviewInteractor;

impl PreviewInteractor {
    pub fn new() -> Self {
        Self
    }

    /// Preview the ordering for a pool at a target duration
    pub fn preview(&self, clips: &[Clip], target: TargetDuration) -> SequencePreview {
        let sequence = ClipSequencer::shuffle(clips);
        let selected = GenerationRules::select_for_output(&sequence, target);
        let clips_needed = GenerationRules::clips_needed(target);

        SequencePreview {
            is_valid: ClipSequencer::is_valid_sequence(&sequence),
            shortfall: clips_needed.saturating_sub(clips.len()),
            distinct_sources: GenerationRules::distinct_sources(clips),
            clips_needed,
            selected,
            sequence,
        }
    }
}

impl Default for PreviewInteractor {
    fn default() -> Self {
        Self::new()
    }
}
