//! Domain types providing compile-time safety and self-documentation
//!
//! Newtype wrappers keep kernel-facing identifiers from being mixed up
//! with plain integers in function signatures.

use std::fmt;

/// Process ID
///
/// The kernel reports PIDs as the trailing component of the `comm-pid`
/// token on every trace line; the same type identifies the lock owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(pub u32);

impl Pid {
    /// The calling process's own PID.
    pub fn current() -> Self {
        Pid(std::process::id())
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Pid(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display_is_bare_number() {
        assert_eq!(Pid(4242).to_string(), "4242");
    }

    #[test]
    fn test_pid_current_matches_process() {
        assert_eq!(Pid::current().0, std::process::id());
    }
}
