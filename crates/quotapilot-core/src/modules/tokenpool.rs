//! Token pool connection watchdog.
//!
//! Keeps a connection to the remote pooling endpoint alive while
//! `auto_connect` is enabled: poll status, reconnect when the pool reports
//! disconnected or errored, and never run two connection attempts at once.
//! The remote operations themselves are opaque; the host supplies a
//! [`PoolService`] implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use quotapilot_types::error::PoolError;
use quotapilot_types::models::PoolStatusReport;

use super::config::ConfigHandle;

/// Status poll period for the steady loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Remote pooling service operations, opaque to the watchdog.
#[async_trait]
pub trait PoolService: Send + Sync {
    /// Query the current connection status.
    async fn status(&self) -> Result<PoolStatusReport, PoolError>;
    /// Open a connection to the given endpoint.
    async fn connect(&self, server_url: &str) -> Result<(), PoolError>;
    /// Tear down the current connection.
    async fn disconnect(&self) -> Result<(), PoolError>;
}

/// Drives the poll → decide → act loop against the pooling service.
///
/// The in-flight guard is owned here and shared with dispatched connect
/// tasks; teardown never touches it, so an attempt that outlives the loop
/// still clears it and a restarted watchdog cannot deadlock.
pub struct ConnectionWatchdog {
    service: Arc<dyn PoolService>,
    config: ConfigHandle,
    attempt_in_flight: Arc<AtomicBool>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionWatchdog {
    /// Create a watchdog over the given service and configuration handle.
    pub fn new(service: Arc<dyn PoolService>, config: ConfigHandle) -> Self {
        Self {
            service,
            config,
            attempt_in_flight: Arc::new(AtomicBool::new(false)),
            poll_task: Mutex::new(None),
        }
    }

    /// Start the poll loop. The first check runs immediately so enabling
    /// the feature reconnects without waiting a full period. An already
    /// running loop is left alone.
    pub fn start(&self) {
        let mut task = self.poll_task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let service = Arc::clone(&self.service);
        let config = self.config.clone();
        let in_flight = Arc::clone(&self.attempt_in_flight);

        *task = Some(tokio::spawn(async move {
            tracing::info!("[TokenPool] Connection watchdog started");
            let mut poll = tokio::time::interval(POLL_INTERVAL);
            loop {
                poll.tick().await;
                run_check(&service, &config, &in_flight).await;
            }
        }));
    }

    /// Cancel future ticks. An attempt already in flight is allowed to
    /// finish and clears its own guard.
    pub fn stop(&self) {
        if let Some(task) = self.poll_task.lock().take() {
            task.abort();
            tracing::info!("[TokenPool] Connection watchdog stopped");
        }
    }

    /// Apply a configuration change in one pass: the current schedule is
    /// discarded and, if auto-connect is still enabled, a new one starts
    /// against the freshly configured endpoint. Switching auto-connect off
    /// also asks the service to drop the connection.
    pub fn reconfigure(&self) {
        self.stop();
        if self.config.snapshot().token_pool.auto_connect {
            self.start();
        } else {
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                if let Err(e) = service.disconnect().await {
                    tracing::warn!("[TokenPool] Disconnect failed: {}", e);
                }
            });
        }
    }

    /// Whether the poll loop is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.poll_task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Whether a connection attempt is currently outstanding.
    pub fn attempt_in_flight(&self) -> bool {
        self.attempt_in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for ConnectionWatchdog {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.lock().take() {
            task.abort();
        }
    }
}

/// One poll → decide → act pass.
///
/// A status-query failure is logged and skipped, never treated as a connect
/// failure. The guard is claimed with a compare-and-swap so overlapping
/// checks can never both dispatch; the dispatched task clears it on
/// completion regardless of outcome.
pub(crate) async fn run_check(
    service: &Arc<dyn PoolService>,
    config: &ConfigHandle,
    in_flight: &Arc<AtomicBool>,
) {
    let snapshot = config.snapshot();
    if !snapshot.token_pool.auto_connect {
        return;
    }
    if in_flight.load(Ordering::SeqCst) {
        tracing::debug!("[TokenPool] Attempt already in flight, skipping tick");
        return;
    }

    let report = match service.status().await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("[TokenPool] Status query failed: {}", e);
            return;
        }
    };

    if !report.status.needs_connect() {
        return;
    }

    if in_flight
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return;
    }

    let server_url = snapshot.token_pool.server_url;
    let service = Arc::clone(service);
    let guard = Arc::clone(in_flight);
    tokio::spawn(async move {
        tracing::info!("[TokenPool] Pool is {}, connecting to {}", report.status, server_url);
        match service.connect(&server_url).await {
            Ok(()) => tracing::info!("[TokenPool] Connected to {}", server_url),
            Err(e) => tracing::warn!("[TokenPool] Connect failed: {}", e),
        }
        guard.store(false, Ordering::SeqCst);
    });
}
