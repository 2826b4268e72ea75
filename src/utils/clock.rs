// file: src/utils/clock.rs
// description: injectable time source for cache expiry, answer ageing and retry backoff
// reference: https://docs.rs/tokio/latest/tokio/time

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic instant, used for cache TTLs.
    fn now(&self) -> Instant;

    /// Wall-clock time, used as the reference point when ageing answers.
    fn utc_now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
