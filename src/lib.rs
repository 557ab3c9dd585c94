//! # retrans - ftrace-based TCP retransmission watcher
//!
//! retrans arms the kernel's `tcp:tcp_retransmit_skb` tracepoint,
//! periodically drains the ftrace buffer, and prints one table row per
//! retransmitted segment. It is the tracefs sibling of BPF-based
//! retransmit tracers: no programs are loaded, only tracing control
//! files are written, so it works on any kernel that carries the
//! tracepoint (Linux 4.15+).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Kernel (ftrace)                         │
//! │  current_tracer ← nop                                    │
//! │  events/tcp/tcp_retransmit_skb/enable ← 1                │
//! └───────────────────────┬──────────────────────────────────┘
//!                         │ trace buffer lines
//!                         ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 retrans (this crate)                     │
//! │                                                          │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐        │
//! │  │ EventSource│──▶│ EventParser│──▶│  Reporter  │        │
//! │  │  (drain)   │   │ (grammar)  │   │  (stdout)  │        │
//! │  └────────────┘   └────────────┘   └────────────┘        │
//! │         ▲                                                │
//! │  ┌──────┴──────────────┐   ┌──────────────────────┐      │
//! │  │ TracepointController│   │ ShutdownCoordinator  │      │
//! │  │   (arm / disarm)    │   │ (signals, teardown)  │      │
//! │  └─────────────────────┘   └──────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`ftrace`]: tracing control-file plumbing
//!   - `controller`: arm/disarm the tracepoint, reset the tracer
//!   - `source`: timed drain-and-clear of the trace buffer
//! - [`event`]: the raw-line grammar and [`event::RetransmitRecord`]
//! - [`report`]: fixed-width table output
//! - [`lock`]: advisory single-instance marker-file lock
//! - [`shutdown`]: first-wins shutdown latch and signal fan-in
//! - [`preflight`]: privilege and tracefs checks before arming
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types (`Pid`) and the error taxonomy
//!
//! ## Lifecycle Guarantees
//!
//! ftrace state is host-global, so the session is bracketed hard: the
//! lock is taken before any kernel state changes, and whether the run
//! ends cleanly, on a fatal error, or on a terminating signal, the
//! teardown sequence (clear buffer, disarm tracepoint, release lock)
//! executes exactly once.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Watch retransmissions until Ctrl+C
//! sudo retrans
//!
//! # Sample for a minute with a 5 second drain interval
//! sudo retrans --duration 60 --interval 5
//! ```

pub mod cli;
pub mod domain;
pub mod event;
pub mod ftrace;
pub mod lock;
pub mod preflight;
pub mod report;
pub mod shutdown;
