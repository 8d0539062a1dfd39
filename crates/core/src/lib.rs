// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rwgate-core: writer-priority readers-writers coordination
//!
//! This crate provides:
//! - A pure admission state machine (reader/writer counters)
//! - The coordinator that owns a shared value and hands out scoped read and
//!   write guards
//! - Bounded and cancellable admission
//! - A task driver, simulated work and run reports for exercising it

pub mod admission;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod gate;
pub mod id;
pub mod report;
pub mod wait;
pub mod work;

// Re-exports
pub use admission::{AdmissionSnapshot, AdmissionState, GateAction, Wake};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, RunConfig};
pub use coordinator::{Coordinator, ReadGuard, WriteGuard};
pub use driver::Driver;
pub use error::{AdmissionError, ProtocolViolation};
pub use id::{AccessKind, TaskId};
pub use report::{AbortedTask, AccessWindow, ReportViolation, RunReport};
pub use wait::{CancelToken, WaitOptions};
pub use work::{FixedDelay, NoDelay, RandomDelay, TracedWork, Work};
