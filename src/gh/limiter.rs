//! Client-side sliding-window rate limiter for API calls.
//!
//! Keeps request timestamps from the last window and delays the next call
//! until the oldest one ages out. This is a local courtesy limit so bursts
//! (batch deletes, rapid filter changes) don't trip the server-side quota.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MAX_REQUESTS: usize = 60;
pub const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    stamps: VecDeque<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_REQUESTS, WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            stamps: VecDeque::with_capacity(max_requests),
        }
    }

    /// How long a request arriving at `now` must wait, or `None` if it may
    /// proceed immediately. Does not record the request.
    pub fn next_delay(&mut self, now: Instant) -> Option<Duration> {
        self.evict(now);
        if self.stamps.len() < self.max_requests {
            return None;
        }
        let oldest = *self.stamps.front()?;
        Some(self.window.saturating_sub(now.duration_since(oldest)))
    }

    /// Record a request that is about to be sent.
    pub fn record(&mut self, now: Instant) {
        self.evict(now);
        self.stamps.push_back(now);
    }

    pub fn in_flight_window(&self) -> usize {
        self.stamps.len()
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&front) = self.stamps.front() {
            if now.duration_since(front) >= self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Wait until a slot is free, then claim it.
    pub async fn acquire(&mut self) {
        loop {
            let now = Instant::now();
            match self.next_delay(now) {
                None => {
                    self.record(now);
                    return;
                }
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}
