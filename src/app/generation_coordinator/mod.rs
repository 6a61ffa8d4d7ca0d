// Generation coordinator - Orchestrates clip selection and encoding per output

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Cooperative cancellation flag shared between a run and its host
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before its next encoder call
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Phase of a single output within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPhase {
    Extracting,
    Concatenating,
    Done,
    Failed,
}

/// Lifecycle of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Rejected,
    Running { output: usize, phase: OutputPhase },
    Completed,
}

/// Logs every run-state transition
struct RunTracker {
    state: RunState,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "generation state");
        self.state = next;
    }
}

/// Outcome of one `generate` call that passed validation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub outputs: Vec<GeneratedOutput>,
    /// Number of outputs the settings asked for
    pub requested: usize,
    /// Run was stopped through its `CancelHandle`
    pub cancelled: bool,
}

impl GenerationReport {
    pub fn succeeded(&self) -> usize {
        self.outputs.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outputs.len() - self.succeeded()
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.outputs.len() == self.requested && self.failed() == 0
    }

    /// Partial-success line such as "3 of 4 outputs succeeded"
    pub fn summary(&self) -> String {
        let mut line = format!("{} of {} outputs succeeded", self.succeeded(), self.requested);
        if self.cancelled {
            line.push_str(" (cancelled)");
        }
        line
    }
}

/// Drives the encoder to turn a clip pool into `count` outputs
///
/// Outputs are produced strictly one after another and every encoder call is
/// awaited before the next one is issued. A failure inside one output is
/// recorded on that output and the run moves on to the next index.
pub struct GenerationCoordinator {
    encoder: Arc<dyn EncoderPort>,
    progress: Arc<dyn ProgressPort>,
    cancel: CancelHandle,
    date: Option<NaiveDate>,
}

impl GenerationCoordinator {
    /// Create new coordinator with injected ports
    pub fn new(encoder: Arc<dyn EncoderPort>, progress: Arc<dyn ProgressPort>) -> Self {
        Self {
            encoder,
            progress,
            cancel: CancelHandle::new(),
            date: None,
        }
    }

    /// Stamp filenames with a fixed date instead of today's
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Generate `settings.count` outputs from `clips`
    ///
    /// Returns `Err` for run-level rejections and for an unavailable encoder,
    /// before any progress event or encoder work.
    /// Per-output failures are carried in the report.
    pub async fn generate(
        &self,
        clips: &[Clip],
        sources: &[SourceVideo],
        settings: &GenerationSettings,
    ) -> Result<GenerationReport, DomainError> {
        let mut tracker = RunTracker::new();

        tracker.advance(RunState::Validating);
        if let Err(e) = GenerationRules::check_preconditions(clips, settings) {
            tracker.advance(RunState::Rejected);
            warn!("Generation rejected: {}", e);
            return Err(e);
        }

        if let Err(e) = self.encoder.check_available().await {
            tracker.advance(RunState::Rejected);
            warn!("{} encoder unavailable: {}", self.encoder.name(), e);
            return Err(e);
        }

        let count = settings.count as usize;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let started = Instant::now();

        info!(
            "Starting generation: {} output(s) of {} as {} from {} clips using {} encoder",
            count,
            settings.target_duration,
            settings.format,
            clips.len(),
            self.encoder.name()
        );

        let mut report = GenerationReport {
            outputs: Vec::with_capacity(count),
            requested: count,
            cancelled: false,
        };

        for index in 0..count {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            // Fresh order of the full pool for every output; clips may repeat across outputs
            let shuffled = ClipSequencer::shuffle(clips);
            let selected = GenerationRules::select_for_output(&shuffled, settings.target_duration);
            if !ClipSequencer::is_valid_sequence(&selected) {
                warn!(
                    output = index + 1,
                    "Selected sequence repeats a source back to back; pool is too uneven to alternate"
                );
            }

            let actual_duration = GenerationRules::total_duration(&selected);
            let filename = OutputNaming::filename(index, actual_duration, date, settings.format);

            self.progress
                .report(&ProgressEvent::new(index, count, ProgressStage::Starting));

            let outcome = match self
                .encode_output(index, count, &selected, sources, settings.format, &filename, &mut tracker)
                .await
            {
                Ok(media) => {
                    tracker.advance(RunState::Running {
                        output: index,
                        phase: OutputPhase::Done,
                    });
                    info!("Generated {} ({:.1}s, {} clips)", filename, actual_duration, selected.len());
                    OutputOutcome::Success { media }
                }
                Err(error) => {
                    tracker.advance(RunState::Running {
                        output: index,
                        phase: OutputPhase::Failed,
                    });
                    if error.stage == EncodeStage::Cancelled {
                        report.cancelled = true;
                    }
                    warn!("Output {} failed: {}", filename, error);
                    OutputOutcome::Failed { error }
                }
            };

            report.outputs.push(GeneratedOutput {
                id: OutputNaming::output_id(index),
                index,
                clips: selected,
                actual_duration,
                filename,
                outcome,
            });

            if report.cancelled {
                break;
            }
        }

        tracker.advance(RunState::Completed);
        info!(
            "Generation finished in {:.2}s: {}",
            started.elapsed().as_secs_f64(),
            report.summary()
        );

        Ok(report)
    }

    /// Extract every selected clip, then concatenate; releases partial work on failure
    #[allow(clippy::too_many_arguments)]
    async fn encode_output(
        &self,
        index: usize,
        count: usize,
        selected: &[Clip],
        sources: &[SourceVideo],
        format: OutputFormat,
        filename: &str,
        tracker: &mut RunTracker,
    ) -> Result<MediaHandle, EncodeError> {
        // Reject bad clips before touching the encoder for this output
        let resolved = selected
            .iter()
            .map(|clip| GenerationRules::validate_clip(clip, sources).map(|source| (source, clip)))
            .collect::<Result<Vec<_>, _>>()?;

        tracker.advance(RunState::Running {
            output: index,
            phase: OutputPhase::Extracting,
        });

        let mut extracted = Vec::with_capacity(resolved.len());
        for (k, (source, clip)) in resolved.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.encoder.discard(extracted).await;
                return Err(EncodeError::cancelled());
            }

            self.progress.report(&ProgressEvent::new(
                index,
                count,
                ProgressStage::Extracting {
                    clip: k + 1,
                    of: resolved.len(),
                },
            ));

            match self.encoder.extract(source, clip).await {
                Ok(handle) => extracted.push(handle),
                Err(e) => {
                    self.encoder.discard(extracted).await;
                    return Err(self.cancellation_or(e));
                }
            }
        }

        if self.cancel.is_cancelled() {
            self.encoder.discard(extracted).await;
            return Err(EncodeError::cancelled());
        }

        tracker.advance(RunState::Running {
            output: index,
            phase: OutputPhase::Concatenating,
        });
        self.progress.report(&ProgressEvent::new(
            index,
            count,
            ProgressStage::Merging {
                clips: extracted.len(),
            },
        ));

        self.encoder
            .concatenate(&extracted, format, filename)
            .await
            .map_err(|e| self.cancellation_or(e))
    }

    /// An interrupt usually kills the encoder's child process too; report that as cancellation
    fn cancellation_or(&self, error: EncodeError) -> EncodeError {
        if self.cancel.is_cancelled() {
            debug!("Encoder error after cancellation: {}", error);
            EncodeError::cancelled()
        } else {
            error
        }
    }
}
