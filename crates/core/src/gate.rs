// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data-access gate
//!
//! A binary lock with no owner: whichever thread acquires it need not be the
//! one that releases it. The first reader takes the gate for the whole reader
//! group and the last reader to leave hands it back, so a scoped mutex guard
//! cannot express it.

use crate::error::{AdmissionError, ProtocolViolation};
use crate::wait::{NextWait, WaitOptions};
use std::sync::{Condvar, Mutex};

#[derive(Debug, Default)]
pub struct DataGate {
    held: Mutex<bool>,
    freed: Condvar,
}

impl DataGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        *self.held.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the gate is free, then take it
    pub fn acquire_now(&self) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while *held {
            held = self.freed.wait(held).unwrap_or_else(|e| e.into_inner());
        }
        *held = true;
    }

    /// Take the gate, giving up per `opts`
    pub fn acquire(&self, opts: &WaitOptions) -> Result<(), AdmissionError> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while *held {
            held = match opts.next_wait()? {
                NextWait::Forever => self.freed.wait(held).unwrap_or_else(|e| e.into_inner()),
                NextWait::For(slice) => {
                    self.freed
                        .wait_timeout(held, slice)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
            };
        }
        *held = true;
        Ok(())
    }

    pub fn release(&self) -> Result<(), ProtocolViolation> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if !*held {
            return Err(ProtocolViolation::GateNotHeld);
        }
        *held = false;
        drop(held);
        self.freed.notify_one();
        Ok(())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
