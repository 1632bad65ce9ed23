//! Escalation sweep scheduler.
//!
//! [`SweepScheduler`] runs as a background task, periodically invoking the
//! escalation sweep over all active enrollments. The sweep itself logs a
//! per-run summary; the scheduler only owns the cadence and shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::escalation::EscalationService;

/// How often the sweep runs unless configured otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(86_400);

// ---------------------------------------------------------------------------
// SweepScheduler
// ---------------------------------------------------------------------------

/// Background service that runs the escalation sweep on a periodic basis.
pub struct SweepScheduler {
    service: Arc<EscalationService>,
    interval: Duration,
}

impl SweepScheduler {
    /// Create a new scheduler around an escalation service.
    pub fn new(service: Arc<EscalationService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run the sweep loop.
    ///
    /// The first tick fires immediately, so a freshly started instance
    /// catches up on overdue alerts without waiting a full interval. The
    /// loop exits gracefully when the provided [`CancellationToken`] is
    /// cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Sweep scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.service.run_sweep().await {
                        tracing::error!(error = %e, "Escalation sweep failed");
                    }
                }
            }
        }
    }
}
