// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission state machine for the readers-writers protocol
//!
//! Holds the two counters that decide admission. Every method here is a pure
//! transition meant to run while the coordinator's control lock is held; the
//! returned [`GateAction`] / [`Wake`] tells the caller which side effect on the
//! data gate or the reader condvar the transition requires.

use crate::error::ProtocolViolation;
use serde::Serialize;

/// What the caller must do with the data-access gate after a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateAction {
    /// First reader entered: take the gate on behalf of all readers
    Acquire,
    /// Last reader left: hand the gate back
    Release,
    /// Gate untouched
    None,
}

/// Who must be woken after a writer leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// No writers remain pending; broadcast to blocked readers
    Readers,
    Nobody,
}

/// Reader/writer counters guarded by the control lock
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionState {
    active_readers: u32,
    pending_writers: u32,
}

/// Point-in-time view of the admission counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AdmissionSnapshot {
    pub active_readers: u32,
    pub pending_writers: u32,
    pub gate_held: bool,
}

impl AdmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_readers(&self) -> u32 {
        self.active_readers
    }

    pub fn pending_writers(&self) -> u32 {
        self.pending_writers
    }

    /// Readers are only admitted while no writer is active or waiting
    pub fn reader_may_enter(&self) -> bool {
        self.pending_writers == 0
    }

    /// Record an admitted reader.
    ///
    /// Callers must have checked [`reader_may_enter`](Self::reader_may_enter)
    /// under the same control-lock critical section.
    pub fn reader_entered(&mut self) -> GateAction {
        self.active_readers += 1;
        if self.active_readers == 1 {
            GateAction::Acquire
        } else {
            GateAction::None
        }
    }

    /// Record a reader leaving its admitted window
    pub fn reader_left(&mut self) -> Result<GateAction, ProtocolViolation> {
        self.active_readers = self
            .active_readers
            .checked_sub(1)
            .ok_or(ProtocolViolation::ReaderUnderflow)?;
        if self.active_readers == 0 {
            Ok(GateAction::Release)
        } else {
            Ok(GateAction::None)
        }
    }

    /// Record a writer announcing intent. New readers are held back from here on.
    pub fn writer_announced(&mut self) {
        self.pending_writers += 1;
    }

    /// Record a writer that finished (or gave up waiting)
    pub fn writer_withdrawn(&mut self) -> Result<Wake, ProtocolViolation> {
        self.pending_writers = self
            .pending_writers
            .checked_sub(1)
            .ok_or(ProtocolViolation::WriterUnderflow)?;
        if self.pending_writers == 0 {
            Ok(Wake::Readers)
        } else {
            Ok(Wake::Nobody)
        }
    }

    pub fn snapshot(&self, gate_held: bool) -> AdmissionSnapshot {
        AdmissionSnapshot {
            active_readers: self.active_readers,
            pending_writers: self.pending_writers,
            gate_held,
        }
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
