//! Artificial request latency.
//!
//! [`RequestSimulator`] stands in for a network round trip: it waits a
//! fixed delay and hands the value back. It never fails today, but it
//! returns a [`Result`] so callers are already written against a fallible
//! transport.

use std::time::Duration;

use tracing::debug;

use crate::source::SourceError;

/// Default latency applied to each simulated request.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Wraps values in an artificial delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSimulator {
    latency: Duration,
}

impl RequestSimulator {
    /// Create a simulator with the given latency.
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// The configured latency.
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Resolve with `value` after the configured latency.
    ///
    /// Each call sleeps independently, so concurrent calls overlap rather
    /// than queue.
    pub async fn simulate<T: Send>(&self, endpoint: &str, value: T) -> Result<T, SourceError> {
        debug!(endpoint, latency_ms = self.latency.as_millis(), "simulated request");
        tokio::time::sleep(self.latency).await;
        Ok(value)
    }
}

impl Default for RequestSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resolves_after_latency() {
        let sim = RequestSimulator::default();
        let started = Instant::now();
        let value = sim.simulate("/status", 7_u8).await;
        assert_eq!(value.ok(), Some(7));
        assert_eq!(started.elapsed(), DEFAULT_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_overlap() {
        let sim = RequestSimulator::new(Duration::from_millis(200));
        let started = Instant::now();
        let (a, b) = tokio::join!(sim.simulate("/a", 1_u8), sim.simulate("/b", 2_u8));
        assert_eq!((a.ok(), b.ok()), (Some(1), Some(2)));
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }
}
