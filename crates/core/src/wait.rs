// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded and cancellable waiting
//!
//! [`WaitOptions`] carries an optional deadline and an optional
//! [`CancelToken`]. Wait loops call [`WaitOptions::next_wait`] once per
//! iteration to learn how long they may block before re-checking.

use crate::error::AdmissionError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Slice a cancellable wait blocks for before re-checking its token
pub const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Shared flag that aborts pending admission requests
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How long an admission request may block
#[derive(Clone, Debug, Default)]
pub struct WaitOptions {
    started: Option<Instant>,
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

/// Outcome of one wait-loop iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextWait {
    /// Block without a bound
    Forever,
    /// Block for at most this long, then re-check
    For(Duration),
}

impl WaitOptions {
    /// Block until admitted
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Give up after `timeout` from now
    pub fn timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: Some(now),
            deadline: Some(now + timeout),
            cancel: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.started.get_or_insert_with(Instant::now);
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel_on(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Check cancellation and the deadline, then report how long to block.
    pub fn next_wait(&self) -> Result<NextWait, AdmissionError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(AdmissionError::Cancelled);
        }

        let remaining = match self.deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    let waited = self
                        .started
                        .map(|s| deadline.duration_since(s))
                        .unwrap_or_default();
                    return Err(AdmissionError::Timeout(waited));
                }
                Some(deadline - now)
            }
            None => None,
        };

        Ok(match (remaining, self.cancel.is_some()) {
            (None, false) => NextWait::Forever,
            (None, true) => NextWait::For(CANCEL_POLL),
            (Some(left), false) => NextWait::For(left),
            (Some(left), true) => NextWait::For(left.min(CANCEL_POLL)),
        })
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
