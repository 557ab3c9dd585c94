//! Lifecycle coordination for shutdown
//!
//! Every way a session can end (operator signal, fatal error, elapsed
//! duration, natural loop exit) funnels into one
//! [`ShutdownCoordinator`]. The first request wins and later requests
//! coalesce into it, so the teardown sequence the caller runs after the
//! main loop can only ever run once. The main loop awaits the
//! coordinator at each suspension point instead of relying on implicit
//! signal dispatch, which is what lets a signal interrupt a cycle
//! mid-read.

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;

/// First-wins shutdown latch.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    requested: AtomicBool,
    notify: Notify,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self { requested: AtomicBool::new(false), notify: Notify::new() }
    }

    /// Request shutdown. The first caller's reason is logged; later
    /// calls are coalesced into the request already in flight.
    pub fn request(&self, reason: &str) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("shutting down: {reason}");
        self.notify.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been requested. Usable as a
    /// `select!` branch at every suspension point; returns immediately
    /// when a request already happened.
    pub async fn wait(&self) {
        // Arm the notification before checking the flag so a request
        // landing between the two cannot be missed.
        let notified = self.notify.notified();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}

/// Route every terminating signal class into the coordinator.
///
/// The spawned task resolves on the first signal delivered; anything
/// arriving after that is coalesced by the request latch.
///
/// # Errors
/// Returns an error when a signal handler cannot be registered.
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut pipe = signal(SignalKind::pipe())?;
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::spawn(async move {
        let reason = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = quit.recv() => "SIGQUIT",
            _ = terminate.recv() => "SIGTERM",
            _ = pipe.recv() => "SIGPIPE",
            _ = hangup.recv() => "SIGHUP",
        };
        coordinator.request(reason);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_after_request() {
        let coordinator = ShutdownCoordinator::new();
        assert!(!coordinator.is_requested());

        coordinator.request("test");
        assert!(coordinator.is_requested());
        coordinator.wait().await;
    }

    #[tokio::test]
    async fn test_repeated_requests_coalesce() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.request("first");
        coordinator.request("second");
        assert!(coordinator.is_requested());
        coordinator.wait().await;
    }

    #[tokio::test]
    async fn test_wait_wakes_on_concurrent_request() {
        let coordinator = Arc::new(ShutdownCoordinator::new());

        let requester = Arc::clone(&coordinator);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            requester.request("concurrent");
        });

        tokio::time::timeout(Duration::from_secs(1), coordinator.wait())
            .await
            .expect("wait should resolve once a request lands");
    }

    #[tokio::test]
    async fn test_wait_interrupts_a_pending_sleep() {
        let coordinator = Arc::new(ShutdownCoordinator::new());

        let requester = Arc::clone(&coordinator);
        tokio::spawn(async move {
            requester.request("interrupt");
        });

        tokio::select! {
            () = tokio::time::sleep(Duration::from_secs(60)) => {
                panic!("shutdown should win the race against the interval wait")
            }
            () = coordinator.wait() => {}
        }
    }
}
