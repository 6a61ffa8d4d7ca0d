use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::{DryRunEncoder, FfmpegEncoder, FfprobeAdapter, TracingProgressAdapter};
use crate::app::{generation_coordinator::GenerationCoordinator, preview_interactor::PreviewInteractor};
use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::ports::{EncoderPort, ProbePort, ProgressPort};

pub trait AppContainer: Send + Sync {
    fn generation_coordinator(&self) -> Arc<GenerationCoordinator>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
    fn probe(&self) -> Arc<dyn ProbePort>;
}

/// Per-invocation wiring choices layered over `AppConfig`
#[derive(Debug, Clone, Default)]
pub struct ContainerOptions {
    /// Overrides `generation.output_dir`
    pub output_dir: Option<PathBuf>,
    /// Plan outputs with `DryRunEncoder` instead of running ffmpeg
    pub dry_run: bool,
    /// Print progress lines to stderr
    pub echo_progress: bool,
}

pub struct DefaultAppContainer {
    generation_coordinator: Arc<GenerationCoordinator>,
    preview_interactor: Arc<PreviewInteractor>,
    probe: Arc<dyn ProbePort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig, options: ContainerOptions) -> Result<Self, DomainError> {
        let output_dir = options
            .output_dir
            .unwrap_or_else(|| config.generation.output_dir.clone());

        let encoder: Arc<dyn EncoderPort> = if options.dry_run {
            Arc::new(DryRunEncoder::new(output_dir))
        } else {
            Arc::new(FfmpegEncoder::new(&config.encoder, output_dir)?)
        };
        debug!("Using {} encoder", encoder.name());

        let probe = Arc::new(FfprobeAdapter::new(config.encoder.ffprobe_path.clone()));
        let progress = Arc::new(TracingProgressAdapter::new(options.echo_progress));

        Ok(Self::from_ports(encoder, probe, progress))
    }

    /// Wire the application around already-built ports
    pub fn from_ports(
        encoder: Arc<dyn EncoderPort>,
        probe: Arc<dyn ProbePort>,
        progress: Arc<dyn ProgressPort>,
    ) -> Self {
        Self {
            generation_coordinator: Arc::new(GenerationCoordinator::new(encoder, progress)),
            preview_interactor: Arc::new(PreviewInteractor::new()),
            probe,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn generation_coordinator(&self) -> Arc<GenerationCoordinator> {
        Arc::clone(&self.generation_coordinator)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }

    fn probe(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe)
    }
}
