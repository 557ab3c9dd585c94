//! Polling drain of the trace buffer
//!
//! The kernel appends event lines to a single buffer shared by every
//! enabled event. Each cycle takes everything currently buffered and
//! clears it, so a cycle only ever sees events emitted since the
//! previous one.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use super::TRACE_BUFFER;

/// Periodically empties the kernel's trace buffer.
pub struct EventSource {
    buffer: PathBuf,
    interval: Duration,
}

impl EventSource {
    pub fn new(root: impl AsRef<Path>, interval: Duration) -> Self {
        Self { buffer: root.as_ref().join(TRACE_BUFFER), interval }
    }

    /// Wait one polling interval, then read every buffered line and
    /// clear the buffer. Comment lines (leading `#`) never leave this
    /// function; accepted lines keep their buffer order.
    ///
    /// Both the wait and the read are suspension points, so a shutdown
    /// request can interrupt a cycle mid-read.
    ///
    /// # Errors
    /// Any open/read/clear failure. The trace stream going away is
    /// fatal for the session; the caller is expected to shut down.
    pub async fn drain(&self) -> std::io::Result<Vec<String>> {
        tokio::time::sleep(self.interval).await;

        let raw = fs::read_to_string(&self.buffer).await?;
        fs::write(&self.buffer, "0").await?;

        let lines: Vec<String> = raw
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(str::to_owned)
            .collect();
        debug!("drained {} event lines", lines.len());
        Ok(lines)
    }

    /// One-shot synchronous buffer clear, used during teardown so a
    /// final partial batch is not replayed to a later tracer.
    /// Best-effort.
    pub fn clear(&self) {
        if let Err(e) = std::fs::write(&self.buffer, "0") {
            warn!("could not clear trace buffer: {e}");
        }
    }
}
