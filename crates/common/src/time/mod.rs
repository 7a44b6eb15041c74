//! Time abstractions for async code.
//!
//! Retry loops sleep through the [`Sleeper`] port so tests can observe the
//! requested delays without waiting for them.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task for a duration.
#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tracing::trace!(delay_ms = duration.as_millis() as u64, "sleeping");
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_tokio_sleeper_waits() {
        let start = Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_zero_duration_returns_immediately() {
        let start = Instant::now();
        TokioSleeper.sleep(Duration::ZERO).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
