//! Shorts Mixer Library
//!
//! Builds short videos from 1.5 second clips marked in several source
//! videos. Clips are reordered so consecutive clips come from different
//! sources, then handed to an external encoder for extraction and
//! concatenation.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{CancelHandle, GenerationCoordinator, GenerationReport, PreviewInteractor};
pub use domain::errors::{DomainError, EncodeError, EncodeStage};
pub use domain::model::{
    Clip, ClipPool, GeneratedOutput, GenerationSettings, OutputFormat, SourceLibrary, SourceVideo,
    TargetDuration,
};
pub use domain::rules::ClipSequencer;
pub use error::{ShortsError, ShortsResult};
pub use ports::{EncoderPort, ProbePort, ProgressEvent, ProgressPort};
