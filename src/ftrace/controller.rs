//! Arming and disarming of the retransmit tracepoint
//!
//! The controller owns the kernel-side tracing state for the session.
//! Arming is two ordered control-file writes; disarming is one write
//! that is safe to repeat, because teardown may run after a partial
//! setup or more than once.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CURRENT_TRACER, RETRANSMIT_ENABLE};
use crate::domain::TraceError;

/// Owns the tracepoint's enabled/disabled state.
///
/// The tracepoint counts as armed only between a successful
/// [`activate`](Self::activate) and the first
/// [`deactivate`](Self::deactivate) attempt.
#[derive(Debug)]
pub struct TracepointController {
    root: PathBuf,
    armed: bool,
}

impl TracepointController {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), armed: false }
    }

    /// Whether activation succeeded and no teardown has run yet.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Reset the tracer to `nop`, then enable the retransmit tracepoint.
    ///
    /// # Errors
    /// [`TraceError::Setup`] when either control file rejects the write.
    /// The caller must still run teardown afterwards so a partial setup
    /// (tracer reset but tracepoint untouched, or vice versa) is not
    /// left behind.
    pub fn activate(&mut self) -> Result<(), TraceError> {
        self.write_control(CURRENT_TRACER, "nop")?;
        self.write_control(RETRANSMIT_ENABLE, "1")?;
        self.armed = true;
        info!("armed tcp:tcp_retransmit_skb under {}", self.root.display());
        Ok(())
    }

    /// Disable the tracepoint.
    ///
    /// Idempotent, and never fatal: once a shutdown is in progress a
    /// failure here is logged and swallowed, since there is nothing left
    /// to unwind to.
    pub fn deactivate(&mut self) {
        self.armed = false;
        match self.try_write(RETRANSMIT_ENABLE, "0") {
            Ok(()) => info!("disarmed tcp:tcp_retransmit_skb"),
            Err(e) => warn!("could not disable tracepoint: {e}"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_control(&self, rel: &str, value: &str) -> Result<(), TraceError> {
        self.try_write(rel, value)
            .map_err(|source| TraceError::Setup { control: rel.to_string(), source })
    }

    fn try_write(&self, rel: &str, value: &str) -> io::Result<()> {
        fs::write(self.root.join(rel), value)
    }
}
