//! Structured error types for retrans
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    /// Another instance owns the tracing subsystem. Reported before any
    /// kernel state is touched; the lock is never overwritten.
    #[error("another instance is already tracing (pid {owner}); remove {path} if that process is gone")]
    Contention { owner: Pid, path: PathBuf },

    #[error(
        "failed to write {control}: {source}\n\n\
         The kernel may lack the tcp:tcp_retransmit_skb tracepoint (Linux 4.15+)\n\
         or tracefs is not mounted at the expected location."
    )]
    Setup {
        control: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
