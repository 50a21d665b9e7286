//! Sliding-window rate limiting
//!
//! Each limiter keeps the admission timestamps of the last window. Stale
//! entries are pruned lazily whenever the limiter is consulted. Rejected
//! attempts are never recorded, so hammering a full limiter does not extend
//! the lockout.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::constants::RATE_LIMIT_WINDOW_NANOS;

/// Snapshot for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub remaining: usize,
    pub time_until_reset: Duration,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    timestamps: VecDeque<u64>,
    ceiling: usize,
    window_nanos: u64,
}

impl RateLimiter {
    /// One-minute window
    pub fn new(ceiling: usize) -> Self {
        Self::with_window(ceiling, RATE_LIMIT_WINDOW_NANOS)
    }

    pub fn with_window(ceiling: usize, window_nanos: u64) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(ceiling),
            ceiling,
            window_nanos,
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Admit and record a request at `now`, or refuse without recording
    pub fn check(&mut self, now: u64) -> bool {
        self.prune(now);

        if self.timestamps.len() >= self.ceiling {
            return false;
        }

        self.timestamps.push_back(now);
        true
    }

    pub fn remaining(&mut self, now: u64) -> usize {
        self.prune(now);
        self.ceiling.saturating_sub(self.timestamps.len())
    }

    /// Time until the oldest retained entry leaves the window; zero when empty
    pub fn time_until_reset(&mut self, now: u64) -> Duration {
        self.prune(now);
        match self.timestamps.front() {
            Some(&oldest) => {
                let reset_at = oldest.saturating_add(self.window_nanos);
                Duration::from_nanos(reset_at.saturating_sub(now))
            }
            None => Duration::ZERO,
        }
    }

    pub fn status(&mut self, now: u64) -> RateLimitStatus {
        RateLimitStatus {
            remaining: self.remaining(now),
            time_until_reset: self.time_until_reset(now),
        }
    }

    /// Drop entries that are a full window old or older
    fn prune(&mut self, now: u64) {
        let cutoff = now.saturating_sub(self.window_nanos);
        while let Some(&oldest) = self.timestamps.front() {
            if oldest > cutoff || now < self.window_nanos {
                break;
            }
            self.timestamps.pop_front();
        }
    }
}
