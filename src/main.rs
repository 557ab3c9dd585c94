//! # retrans - Main Entry Point
//!
//! Arms the `tcp:tcp_retransmit_skb` tracepoint, then alternates between
//! a timed wait and a full drain of the trace buffer until interrupted.
//! Teardown (buffer clear, disarm, lock release) runs exactly once on
//! every exit path.

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use retrans::cli::Args;
use retrans::domain::TraceError;
use retrans::event;
use retrans::ftrace::{EventSource, TracepointController, DEFAULT_TRACING_ROOT};
use retrans::lock::{LockGuard, DEFAULT_LOCK_PATH};
use retrans::preflight::run_preflight_checks;
use retrans::report::Reporter;
use retrans::shutdown::{install_signal_handlers, ShutdownCoordinator};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_CONTENTION: i32 = 2;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if matches!(err.downcast_ref::<TraceError>(), Some(TraceError::Contention { .. })) {
        return EXIT_CONTENTION;
    }
    let msg = err.to_string().to_lowercase();
    if msg.contains("permission denied") || msg.contains("requires root") {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();

    if args.loss_probes {
        warn!("--loss-probes accepted for compatibility; tail loss probes are not traced");
    }
    if args.stacks {
        warn!("--stacks accepted for compatibility; stack traces are not printed");
    }

    let tracing_root = Path::new(DEFAULT_TRACING_ROOT);
    run_preflight_checks(tracing_root)?;

    // The lock comes first: on contention we exit without having touched
    // any kernel state.
    let lock = LockGuard::acquire(DEFAULT_LOCK_PATH)?;

    let coordinator = Arc::new(ShutdownCoordinator::new());
    install_signal_handlers(Arc::clone(&coordinator))
        .context("failed to install signal handlers")?;

    let mut controller = TracepointController::new(tracing_root);
    let source = EventSource::new(tracing_root, Duration::from_secs(args.interval));

    let outcome = trace_loop(&args, &coordinator, &mut controller, &source).await;

    // Fatal errors and natural exits request shutdown here; signal
    // paths already did, and coalesce.
    coordinator.request(if outcome.is_ok() { "trace loop ended" } else { "fatal error" });

    // Teardown: exactly once, in this order, on every exit path, even
    // after a partially failed activation.
    source.clear();
    controller.deactivate();
    lock.release();

    outcome
}

/// Arm the tracepoint and run the drain → parse → report loop until a
/// shutdown request, the duration limit, or a fatal error stops it.
async fn trace_loop(
    args: &Args,
    coordinator: &ShutdownCoordinator,
    controller: &mut TracepointController,
    source: &EventSource,
) -> Result<()> {
    controller.activate()?;

    let mut reporter = Reporter::new(std::io::stdout());
    reporter.header().context("failed to write report header")?;

    let started = Instant::now();
    let duration_limit =
        if args.duration > 0 { Some(Duration::from_secs(args.duration)) } else { None };

    loop {
        if let Some(limit) = duration_limit {
            if started.elapsed() >= limit {
                coordinator.request("duration limit reached");
            }
        }
        if coordinator.is_requested() {
            return Ok(());
        }

        tokio::select! {
            batch = source.drain() => {
                let batch = batch
                    .map_err(TraceError::Io)
                    .context("trace stream failed")?;
                let observed_at = chrono::Local::now();
                for line in &batch {
                    if let Some(record) = event::parse_line(line, observed_at) {
                        reporter.emit(&record).context("failed to write report row")?;
                    }
                }
                reporter.flush().ok();
            }
            () = coordinator.wait() => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrans::domain::Pid;
    use std::path::PathBuf;

    #[test]
    fn test_contention_maps_to_its_own_exit_code() {
        let err = anyhow::Error::new(TraceError::Contention {
            owner: Pid(4242),
            path: PathBuf::from("/var/tmp/.ftrace-lock"),
        });
        assert_eq!(exit_code_for(&err), EXIT_CONTENTION);
    }

    #[test]
    fn test_permission_failure_maps_to_noperm() {
        let err = anyhow::anyhow!("Permission denied: retrans requires root privileges");
        assert_eq!(exit_code_for(&err), EXIT_NOPERM);
    }

    #[test]
    fn test_other_failures_map_to_generic_error() {
        let err = anyhow::anyhow!("trace stream failed");
        assert_eq!(exit_code_for(&err), EXIT_ERROR);
    }
}
