// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writer-priority readers-writers coordinator
//!
//! Writers announce intent under the control lock before contending for the
//! data gate, so any reader arriving after that announcement waits until every
//! pending writer has finished. Readers already admitted are never preempted;
//! a writer simply waits for the last of them to hand the gate back.
//!
//! Lock order is control lock, then gate. The value lock is only ever tried,
//! never waited on: finding it busy means admission let two conflicting
//! tasks in.

use crate::admission::{AdmissionSnapshot, AdmissionState, GateAction, Wake};
use crate::error::{AdmissionError, ProtocolViolation};
use crate::gate::DataGate;
use crate::id::{AccessKind, TaskId};
use crate::wait::{NextWait, WaitOptions};
use std::convert::Infallible;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{
    Condvar, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
};
use tracing::{debug, error, warn};

/// Owns a shared value and mediates all access to it
pub struct Coordinator<T> {
    /// Only touched under admission; contention is a protocol violation
    value: RwLock<T>,
    control: Mutex<AdmissionState>,
    /// Broadcast when the last pending writer leaves
    writers_drained: Condvar,
    gate: DataGate,
}

impl<T> Coordinator<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            control: Mutex::new(AdmissionState::new()),
            writers_drained: Condvar::new(),
            gate: DataGate::new(),
        }
    }

    /// Wait until no writer is pending, then join the reader group
    pub fn begin_read(&self, id: TaskId) -> ReadGuard<'_, T> {
        let admitted = self.admit_reader(&id, |state| {
            Ok::<_, Infallible>(
                self.writers_drained
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner()),
            )
        });
        match admitted {
            Ok(()) => self.read_guard(id),
            Err(never) => match never {},
        }
    }

    /// [`begin_read`](Self::begin_read) that gives up per `opts`
    pub fn begin_read_with(
        &self,
        id: TaskId,
        opts: &WaitOptions,
    ) -> Result<ReadGuard<'_, T>, AdmissionError> {
        let admitted = self.admit_reader(&id, |state| {
            Ok(match opts.next_wait()? {
                NextWait::Forever => self
                    .writers_drained
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner()),
                NextWait::For(slice) => {
                    self.writers_drained
                        .wait_timeout(state, slice)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
            })
        });

        match admitted {
            Ok(()) => Ok(self.read_guard(id)),
            Err(e) => {
                warn!(task = %id, error = %e, "gave up waiting to read");
                Err(e)
            }
        }
    }

    /// Announce intent, then wait for exclusive use of the data gate
    pub fn begin_write(&self, id: TaskId) -> WriteGuard<'_, T> {
        self.announce_writer(&id);
        debug!(task = %id, "waiting for data gate");
        self.gate.acquire_now();
        debug!(task = %id, "got access to data");
        self.write_guard(id)
    }

    /// [`begin_write`](Self::begin_write) that gives up per `opts`.
    ///
    /// A writer that gives up withdraws its announcement, so readers held back
    /// by it are released if it was the last one pending.
    pub fn begin_write_with(
        &self,
        id: TaskId,
        opts: &WaitOptions,
    ) -> Result<WriteGuard<'_, T>, AdmissionError> {
        self.announce_writer(&id);
        debug!(task = %id, "waiting for data gate");
        if let Err(e) = self.gate.acquire(opts) {
            warn!(task = %id, error = %e, "gave up waiting to write");
            self.withdraw_writer(&id);
            return Err(e);
        }
        debug!(task = %id, "got access to data");
        Ok(self.write_guard(id))
    }

    /// Current counters and gate state
    pub fn snapshot(&self) -> AdmissionSnapshot {
        let state = self.control();
        state.snapshot(self.gate.is_held())
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn control(&self) -> MutexGuard<'_, AdmissionState> {
        self.control.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reader wait loop. `wait` blocks on the condvar once; every wake is
    /// followed by a fresh check of the pending-writer count.
    fn admit_reader<'a, E>(
        &'a self,
        id: &TaskId,
        mut wait: impl FnMut(
            MutexGuard<'a, AdmissionState>,
        ) -> Result<MutexGuard<'a, AdmissionState>, E>,
    ) -> Result<(), E> {
        let mut state = self.control();
        debug!(task = %id, "wants to read");

        while !state.reader_may_enter() {
            debug!(
                task = %id,
                pending_writers = state.pending_writers(),
                "pending writer(s), wait"
            );
            state = wait(state)?;
        }

        debug!(task = %id, "no pending writer");
        if state.reader_entered() == GateAction::Acquire {
            debug!(task = %id, "first reader, taking data gate");
            // pending_writers == 0 means no writer holds the gate
            self.gate.acquire_now();
        }
        Ok(())
    }

    fn announce_writer(&self, id: &TaskId) {
        let mut state = self.control();
        state.writer_announced();
        debug!(
            task = %id,
            pending_writers = state.pending_writers(),
            "wants to write"
        );
    }

    fn withdraw_writer(&self, id: &TaskId) {
        let mut state = self.control();
        let outcome = state.writer_withdrawn().map(|wake| {
            if wake == Wake::Readers {
                debug!(task = %id, "last writer, notify readers");
                self.writers_drained.notify_all();
            }
        });
        self.check(id, outcome);
    }

    /// Leave the reader group; the last reader out frees the gate
    fn end_read(&self, id: &TaskId) {
        let mut state = self.control();
        debug!(task = %id, "done reading");
        let outcome = state.reader_left().and_then(|action| match action {
            GateAction::Release => {
                debug!(task = %id, "last reader, releasing data gate");
                self.gate.release()
            }
            _ => Ok(()),
        });
        self.check(id, outcome);
    }

    /// Free the gate, then retire the announcement
    fn end_write(&self, id: &TaskId) {
        debug!(task = %id, "done writing, releasing data gate");
        let released = self.gate.release();
        self.check(id, released);
        self.withdraw_writer(id);
    }

    fn check(&self, id: &TaskId, outcome: Result<(), ProtocolViolation>) {
        if let Err(violation) = outcome {
            error!(task = %id, %violation, "protocol violation");
        }
        debug_assert!(outcome.is_ok(), "protocol violation by {id}");
    }

    // The admission is built first so a violation panic still releases it
    fn read_guard(&self, id: TaskId) -> ReadGuard<'_, T> {
        let admission = Admission {
            coordinator: self,
            id,
            kind: AccessKind::Read,
        };
        let value = match self.value.try_read() {
            Ok(value) => value,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => {
                self.check(&id, Err(ProtocolViolation::ValueBusy));
                self.value.read().unwrap_or_else(|e| e.into_inner())
            }
        };
        ReadGuard { value, admission }
    }

    fn write_guard(&self, id: TaskId) -> WriteGuard<'_, T> {
        let admission = Admission {
            coordinator: self,
            id,
            kind: AccessKind::Write,
        };
        let value = match self.value.try_write() {
            Ok(value) => value,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => {
                self.check(&id, Err(ProtocolViolation::ValueBusy));
                self.value.write().unwrap_or_else(|e| e.into_inner())
            }
        };
        WriteGuard { value, admission }
    }
}

impl<T: Default> Default for Coordinator<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Coordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("admission", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Runs the matching `end_*` when dropped, including during unwinding.
///
/// The side is fixed by which `begin_*` admitted the task; the id is only a
/// log label.
struct Admission<'a, T> {
    coordinator: &'a Coordinator<T>,
    id: TaskId,
    kind: AccessKind,
}

impl<T> Drop for Admission<'_, T> {
    fn drop(&mut self) {
        match self.kind {
            AccessKind::Read => self.coordinator.end_read(&self.id),
            AccessKind::Write => self.coordinator.end_write(&self.id),
        }
    }
}

/// Shared access to the value for one admitted reader
pub struct ReadGuard<'a, T> {
    // Field order matters: the value borrow drops before admission ends
    value: RwLockReadGuard<'a, T>,
    admission: Admission<'a, T>,
}

impl<T> ReadGuard<'_, T> {
    pub fn id(&self) -> TaskId {
        self.admission.id
    }

    /// Leave the admitted window now rather than at scope exit
    pub fn end(self) {
        drop(self);
    }
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Exclusive access to the value for one admitted writer
pub struct WriteGuard<'a, T> {
    value: RwLockWriteGuard<'a, T>,
    admission: Admission<'a, T>,
}

impl<T> WriteGuard<'_, T> {
    pub fn id(&self) -> TaskId {
        self.admission.id
    }

    pub fn end(self) {
        drop(self);
    }
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
