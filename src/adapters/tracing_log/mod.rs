// Tracing progress adapter - Structured progress events using tracing crate

use std::io::Write;

use tracing::info;

use crate::ports::*;

/// Reports generation progress as `info!` events, optionally echoing a status line
pub struct TracingProgressAdapter {
    echo: bool,
}

impl TracingProgressAdapter {
    /// Create new adapter; `echo` also prints `[ 42%] message` lines to stderr
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }

    /// Status line printed when echoing
    pub fn status_line(event: &ProgressEvent) -> String {
        format!("[{:>3}%] {}", event.percent(), event.message())
    }
}

impl ProgressPort for TracingProgressAdapter {
    fn report(&self, event: &ProgressEvent) {
        info!(
            output = event.output + 1,
            outputs = event.output_count,
            percent = event.percent(),
            "{}",
            event.message()
        );

        if self.echo {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", Self::status_line(event));
        }
    }
}
