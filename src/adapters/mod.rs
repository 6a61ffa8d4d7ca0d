// Adapters - External system implementations

pub mod dry_run;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod tracing_log;

// Re-export adapters
pub use dry_run::DryRunEncoder;
pub use exec_ffmpeg::FfmpegEncoder;
pub use probe_ffprobe::FfprobeAdapter;
pub use tracing_log::TracingProgressAdapter;
