use std::time::{Duration, Instant};

/// Enforces a minimum delay between consecutive requests
///
/// The first request goes out immediately. Later requests wait until
/// `delay` has passed since the previous one started.
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Time left before the next request may start, `None` if it may start now
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.delay {
            None
        } else {
            Some(self.delay - elapsed)
        }
    }

    /// Waits until the next request may start and records it
    pub async fn wait(&mut self) {
        if let Some(remaining) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Throttling for {:?}", remaining);
            tokio::time::sleep(remaining).await;
        }
        self.last_request = Some(Instant::now());
    }
}
