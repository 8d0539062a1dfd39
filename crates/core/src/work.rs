// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated work performed inside an admitted window
//!
//! The coordinator never calls these; tasks do, between `begin_*` and the
//! guard going out of scope. Durations are the only thing that varies.

use rand::Rng;
use std::time::{Duration, Instant};

/// Work a task performs while admitted
pub trait Work: Send + Sync {
    fn perform(&self);
}

impl<W: Work + ?Sized> Work for &W {
    fn perform(&self) {
        (**self).perform()
    }
}

impl<W: Work + ?Sized> Work for Box<W> {
    fn perform(&self) {
        (**self).perform()
    }
}

/// Returns immediately
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

impl Work for NoDelay {
    fn perform(&self) {}
}

/// Sleeps for a fixed duration
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl Work for FixedDelay {
    fn perform(&self) {
        std::thread::sleep(self.0);
    }
}

/// Sleeps for a uniformly random whole number of milliseconds below `max`
#[derive(Clone, Copy, Debug)]
pub struct RandomDelay {
    pub max: Duration,
}

impl RandomDelay {
    pub fn up_to(max: Duration) -> Self {
        Self { max }
    }

    /// Draw the next pause; zero when `max` is under a millisecond
    pub fn sample(&self) -> Duration {
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}

impl Work for RandomDelay {
    fn perform(&self) {
        let pause = self.sample();
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }
}

/// Wrapper that adds tracing to any Work
#[derive(Clone, Debug)]
pub struct TracedWork<W> {
    label: &'static str,
    inner: W,
}

impl<W> TracedWork<W> {
    pub fn new(label: &'static str, inner: W) -> Self {
        Self { label, inner }
    }
}

impl<W: Work> Work for TracedWork<W> {
    fn perform(&self) {
        let span = tracing::trace_span!("work", label = self.label);
        let _guard = span.enter();

        let start = Instant::now();
        self.inner.perform();
        tracing::trace!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
    }
}

#[cfg(test)]
#[path = "work_tests.rs"]
mod tests;
