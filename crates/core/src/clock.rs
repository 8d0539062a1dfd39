// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for access-window timestamps

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fake clock for testing with controllable time.
///
/// A ticking clock advances by its step on every read, so consecutive
/// timestamps taken by one thread are strictly increasing.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    tick: Duration,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            tick: Duration::ZERO,
        }
    }

    pub fn ticking(step: Duration) -> Self {
        Self {
            tick: step,
            ..Self::new()
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let now = *current;
        *current += self.tick;
        now
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
