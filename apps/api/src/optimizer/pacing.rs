//! Pacing policies for backend calls.
//!
//! The pipeline builds one policy per run and calls `acquire` before every
//! backend invocation of that run. Separate runs never wait on each other.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Waits until the next backend call is allowed to start.
    async fn acquire(&self);
}

/// No pacing at all.
pub struct Unpaced;

#[async_trait]
impl RateLimiter for Unpaced {
    async fn acquire(&self) {}
}

/// Enforces a minimum gap between the starts of consecutive calls.
/// The first call is never delayed.
pub struct FixedDelay {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl FixedDelay {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "Pacing backend call"
                );
                sleep_until(ready_at).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}
