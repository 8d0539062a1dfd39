// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for admission and protocol bookkeeping

use std::time::Duration;
use thiserror::Error;

/// Why a bounded or cancellable admission request gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("admission timed out after {0:?}")]
    Timeout(Duration),
    #[error("admission cancelled")]
    Cancelled,
}

/// A release that does not match any prior acquisition.
///
/// Unreachable through the guard API unless admission itself is broken;
/// surfaced by the raw state machine, the data gate and the value lock so
/// tests can assert on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("end_read without a matching begin_read")]
    ReaderUnderflow,
    #[error("end_write without a matching begin_write")]
    WriterUnderflow,
    #[error("data gate released while free")]
    GateNotHeld,
    #[error("shared value busy on admission")]
    ValueBusy,
}
