//! Fixed-interval pacing for upstream calls.
//!
//! Every outbound request waits on the gate first. The gate belongs to the gateway; scoring
//! code never sees it.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct IntervalGate {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until at least `interval` has passed since the previous admission.
    pub async fn ready(&self) {
        if self.interval.is_zero() {
            return;
        }

        // Holding the lock across the sleep serialises concurrent callers.
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let next = prev + self.interval;
            if next > Instant::now() {
                let wait_ms = next.saturating_duration_since(Instant::now()).as_millis() as u64;
                tracing::trace!(wait_ms, "pacing upstream call");
                tokio::time::sleep_until(next).await;
            }
        }
        *last = Some(Instant::now());
    }
}
