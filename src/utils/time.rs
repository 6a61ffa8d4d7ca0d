//! Time formatting for clip lists and playback positions

/// Format a clip start time as `m:ss.d`
///
/// The tenths digit is truncated, not rounded: 75.56 formats as `1:15.5`.
pub fn format_clip_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let whole = (seconds % 60.0).floor() as u64;
    let tenths = ((seconds % 1.0) * 10.0).floor() as u64;
    format!("{}:{:02}.{}", minutes, whole, tenths.min(9))
}

/// Format a playback position as `m:ss`
pub fn format_position(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let whole = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, whole)
}

/// Format a clip range as `m:ss.d - m:ss.d`
pub fn format_clip_range(start: f64, end: f64) -> String {
    format!("{} - {}", format_clip_time(start), format_clip_time(end))
}
