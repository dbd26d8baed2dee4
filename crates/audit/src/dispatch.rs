//! Background alert dispatcher with bounded retry and backoff.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::{Alert, AlertSink};

/// Alert dispatcher configuration.
#[derive(Debug, Clone)]
pub struct AlertDispatcherConfig {
    /// Maximum delivery attempts per alert (including the first).
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles per attempt.
    pub initial_backoff: Duration,
    /// How long the worker waits on the channel before re-checking shutdown.
    pub poll_interval: Duration,
    /// Name for logging / thread naming.
    pub name: String,
}

impl Default for AlertDispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            poll_interval: Duration::from_millis(100),
            name: "alert-dispatcher".to_string(),
        }
    }
}

impl AlertDispatcherConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

/// Dispatcher runtime statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DispatcherStats {
    pub alerts_delivered: u64,
    pub delivery_retries: u64,
    pub alerts_dropped: u64,
}

/// Handle to control a running dispatcher.
#[derive(Debug)]
pub struct AlertDispatcherHandle {
    sender: mpsc::Sender<Alert>,
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<DispatcherStats>>,
}

impl AlertDispatcherHandle {
    /// Channel end the audit logger pushes denial alerts into.
    ///
    /// Sending is non-blocking; this is the boundary that keeps sink latency
    /// and sink failures off the evaluation path.
    pub fn sender(&self) -> mpsc::Sender<Alert> {
        self.sender.clone()
    }

    /// Request graceful shutdown and wait for the worker to drain.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Current dispatcher statistics.
    pub fn stats(&self) -> DispatcherStats {
        self.stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

/// Background worker that delivers denial alerts to an [`AlertSink`].
///
/// Delivery is best-effort with bounded retry: each alert gets up to
/// `max_attempts` tries with exponential backoff, then is dropped with an
/// error log. The triggering access decision already happened and is never
/// revisited.
pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// Spawn the dispatcher on a background thread.
    pub fn spawn(self, config: AlertDispatcherConfig) -> AlertDispatcherHandle {
        let (alert_tx, alert_rx) = mpsc::channel::<Alert>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(DispatcherStats::default()));
        let stats_clone = stats.clone();

        let name = config.name.clone();
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || {
                dispatcher_loop(self.sink, config, alert_rx, shutdown_rx, stats_clone);
            })
            .expect("failed to spawn alert dispatcher thread");

        AlertDispatcherHandle {
            sender: alert_tx,
            shutdown: shutdown_tx,
            join: Some(join),
            stats,
        }
    }
}

fn dispatcher_loop(
    sink: Arc<dyn AlertSink>,
    config: AlertDispatcherConfig,
    alerts: mpsc::Receiver<Alert>,
    shutdown_rx: mpsc::Receiver<()>,
    stats: Arc<Mutex<DispatcherStats>>,
) {
    info!(dispatcher = %config.name, "alert dispatcher started");

    loop {
        if shutdown_rx.try_recv().is_ok() {
            // Drain whatever is already queued before exiting.
            while let Ok(alert) = alerts.try_recv() {
                deliver_with_retry(&*sink, &config, &alert, &stats);
            }
            break;
        }

        match alerts.recv_timeout(config.poll_interval) {
            Ok(alert) => deliver_with_retry(&*sink, &config, &alert, &stats),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(dispatcher = %config.name, "alert dispatcher stopped");
}

fn deliver_with_retry(
    sink: &dyn AlertSink,
    config: &AlertDispatcherConfig,
    alert: &Alert,
    stats: &Arc<Mutex<DispatcherStats>>,
) {
    let mut backoff = config.initial_backoff;

    for attempt in 1..=config.max_attempts {
        match sink.deliver(alert) {
            Ok(()) => {
                debug!(path = %alert.path, reason = %alert.reason, attempt, "alert delivered");
                if let Ok(mut s) = stats.lock() {
                    s.alerts_delivered += 1;
                }
                return;
            }
            Err(e) if attempt < config.max_attempts => {
                warn!(
                    path = %alert.path,
                    attempt,
                    error = %e,
                    backoff_ms = backoff.as_millis() as u64,
                    "alert delivery failed, retrying"
                );
                if let Ok(mut s) = stats.lock() {
                    s.delivery_retries += 1;
                }
                thread::sleep(backoff);
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => {
                error!(
                    path = %alert.path,
                    reason = %alert.reason,
                    attempts = config.max_attempts,
                    error = %e,
                    "alert dropped after exhausting retries"
                );
                if let Ok(mut s) = stats.lock() {
                    s.alerts_dropped += 1;
                }
            }
        }
    }
}
