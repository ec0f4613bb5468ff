//! Simulated backend latency

use std::time::Duration;
use tracing::debug;

/// Fixed artificial delay awaited before producing a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    delay: Duration,
}

impl Latency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the configured delay
    pub async fn simulate(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("Simulating {:?} of latency", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}
