//! Timer capability injected into the controller.
//!
//! The submission delays are scheduling, not domain rules. Routing them through
//! [`Clock`] lets tests complete a cycle without waiting on wall-clock time.

use std::future::Future;
use std::time::Duration;

/// Source of timed continuations.
pub trait Clock: Send + Sync {
    /// Resolve after `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Clock backed by the tokio timer (honours paused test time).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_waits_for_duration() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_millis(1000)).await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_returns_immediately() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
