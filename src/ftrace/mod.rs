//! ftrace control-file plumbing
//!
//! Everything that touches the kernel's tracing directory lives here:
//! [`controller`] arms and disarms the retransmit tracepoint and
//! [`source`] drains the trace buffer. All paths are relative to a
//! tracing root so tests can point both components at a scratch
//! directory.

pub mod controller;
pub mod source;

pub use controller::TracepointController;
pub use source::EventSource;

/// Default tracing control directory.
pub const DEFAULT_TRACING_ROOT: &str = "/sys/kernel/debug/tracing";

/// Tracer selector, relative to the root. Reset to `nop` before arming
/// so a previously selected tracer cannot flood the buffer.
pub const CURRENT_TRACER: &str = "current_tracer";

/// Enable toggle for the retransmit tracepoint, relative to the root.
pub const RETRANSMIT_ENABLE: &str = "events/tcp/tcp_retransmit_skb/enable";

/// Drainable event buffer, relative to the root.
pub const TRACE_BUFFER: &str = "trace";
