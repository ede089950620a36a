// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rate limiting for pointer-move handling and periodic polling.

use std::time::{Duration, Instant};

/// Interval used to coalesce pointer moves while drawing or dragging.
pub const POINTER_INTERVAL: Duration = Duration::from_millis(100);

/// Lets at most one event through per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true and arms the throttle if `now` is outside the window
    /// opened by the previous accepted event.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the previous event so the next one passes immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
