//! Advisory single-instance lock
//!
//! ftrace state is host-global, so only one tracer may own it at a time.
//! Ownership is signalled by a marker file holding the owner's PID. The
//! exclusion is cooperative: a marker left behind by a crashed process
//! stays in force until an operator removes it, and the contention error
//! says exactly which file to remove.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{Pid, TraceError};

/// Default marker path; shared with other ftrace-driving tools so they
/// exclude each other as well.
pub const DEFAULT_LOCK_PATH: &str = "/var/tmp/.ftrace-lock";

/// Held for the lifetime of a tracing session.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Take ownership of the marker file.
    ///
    /// An existing marker is never overwritten, whatever its age: a
    /// present file means another instance owns the tracing subsystem.
    ///
    /// # Errors
    /// [`TraceError::Contention`] with the recorded owner PID when the
    /// marker exists; [`TraceError::Io`] when it cannot be read or
    /// created.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, TraceError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(content) => {
                let owner = content.trim().parse::<u32>().map(Pid).unwrap_or(Pid(0));
                Err(TraceError::Contention { owner, path })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::write(&path, format!("{}\n", Pid::current()))?;
                info!("acquired tracing lock at {}", path.display());
                Ok(LockGuard { path })
            }
            Err(e) => Err(TraceError::Io(e)),
        }
    }

    /// Delete the marker file unconditionally.
    ///
    /// Idempotent: a missing file is not an error, and any other removal
    /// failure is logged rather than raised, since release only runs
    /// once teardown is already in progress.
    pub fn release(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("released tracing lock"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove lock {}: {e}", self.path.display()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lock_path(dir: &TempDir) -> PathBuf {
        dir.path().join(".ftrace-lock")
    }

    #[test]
    fn test_acquire_writes_own_pid() {
        let dir = TempDir::new().unwrap();
        let path = lock_path(&dir);

        let guard = LockGuard::acquire(&path).unwrap();

        let content = fs::read_to_string(guard.path()).unwrap();
        assert_eq!(content.trim().parse::<u32>().unwrap(), std::process::id());
    }

    #[test]
    fn test_acquire_reports_contention_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let path = lock_path(&dir);
        fs::write(&path, "4242\n").unwrap();

        let err = LockGuard::acquire(&path).unwrap_err();

        assert!(matches!(err, TraceError::Contention { owner: Pid(4242), .. }));
        // The existing marker is untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), "4242\n");
    }

    #[test]
    fn test_release_removes_marker_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = lock_path(&dir);

        let guard = LockGuard::acquire(&path).unwrap();
        guard.release();
        assert!(!path.exists());

        // Second release with the marker already gone is fine.
        guard.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_lock_can_be_reacquired_after_release() {
        let dir = TempDir::new().unwrap();
        let path = lock_path(&dir);

        LockGuard::acquire(&path).unwrap().release();
        assert!(LockGuard::acquire(&path).is_ok());
    }
}
