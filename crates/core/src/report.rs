// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run reports and after-the-fact verification
//!
//! Each task records its admitted window as offsets from the start of the
//! run. `admitted_at` is taken after `begin_*` returns and `released_at`
//! before the guard drops, so a recorded window always lies inside the real
//! one and any overlap between recorded windows is a genuine violation.

use crate::id::{AccessKind, TaskId};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One admitted window
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccessWindow {
    pub task: TaskId,
    #[serde(with = "humantime_serde")]
    pub requested_at: Duration,
    #[serde(with = "humantime_serde")]
    pub admitted_at: Duration,
    #[serde(with = "humantime_serde")]
    pub released_at: Duration,
    /// Value a reader saw, or the value a writer left behind
    pub value: i64,
}

impl AccessWindow {
    pub fn kind(&self) -> AccessKind {
        self.task.kind()
    }

    /// Time spent blocked in `begin_*`
    pub fn waited(&self) -> Duration {
        self.admitted_at.saturating_sub(self.requested_at)
    }

    fn overlaps(&self, other: &AccessWindow) -> bool {
        self.admitted_at < other.released_at && other.admitted_at < self.released_at
    }
}

/// A task that never got admitted
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AbortedTask {
    pub task: TaskId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportViolation {
    #[error("{first} and {second} were admitted at the same time")]
    Overlap { first: TaskId, second: TaskId },
    #[error("final value {actual}, expected {expected}")]
    FinalValue { expected: i64, actual: i64 },
    #[error("{task} left {value}, which no sequence of writes produces")]
    ImpossibleValue { task: TaskId, value: i64 },
    #[error("{writer} left {value}, already left by another writer")]
    DuplicateWrite { writer: TaskId, value: i64 },
    #[error("{reader} saw {value}, expected between {min} and {max}")]
    StaleRead {
        reader: TaskId,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Everything a run produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub initial_value: i64,
    pub write_delta: i64,
    pub final_value: i64,
    pub windows: Vec<AccessWindow>,
    pub aborted: Vec<AbortedTask>,
}

impl RunReport {
    pub fn readers(&self) -> impl Iterator<Item = &AccessWindow> {
        self.windows.iter().filter(|w| w.kind() == AccessKind::Read)
    }

    pub fn writers(&self) -> impl Iterator<Item = &AccessWindow> {
        self.windows.iter().filter(|w| w.kind() == AccessKind::Write)
    }

    /// Longest time any task spent waiting for admission
    pub fn max_wait(&self) -> Duration {
        self.windows
            .iter()
            .map(AccessWindow::waited)
            .max()
            .unwrap_or_default()
    }

    /// Check the first violation found, if any
    pub fn verify(&self) -> Result<(), ReportViolation> {
        match self.violations().into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Every violation found in the recorded windows
    pub fn violations(&self) -> Vec<ReportViolation> {
        let mut found = Vec::new();
        self.check_exclusion(&mut found);
        self.check_final_value(&mut found);
        self.check_writes(&mut found);
        self.check_reads(&mut found);
        found
    }

    fn check_exclusion(&self, found: &mut Vec<ReportViolation>) {
        for (i, writer) in self.windows.iter().enumerate() {
            if writer.kind() != AccessKind::Write {
                continue;
            }
            for (j, other) in self.windows.iter().enumerate() {
                // Writer pairs are checked once
                let seen = other.kind() == AccessKind::Write && j <= i;
                if i != j && !seen && writer.overlaps(other) {
                    found.push(ReportViolation::Overlap {
                        first: writer.task,
                        second: other.task,
                    });
                }
            }
        }
    }

    fn check_final_value(&self, found: &mut Vec<ReportViolation>) {
        let expected = self.value_after(self.writers().count() as i64);
        if expected != Some(self.final_value) {
            found.push(ReportViolation::FinalValue {
                expected: expected.unwrap_or(i64::MAX),
                actual: self.final_value,
            });
        }
    }

    fn check_writes(&self, found: &mut Vec<ReportViolation>) {
        let writes = self.writers().count() as i64;
        let mut seen = Vec::new();
        for writer in self.writers() {
            match self.writes_before(writer.value) {
                Some(k) if (1..=writes).contains(&k) => {
                    if seen.contains(&k) {
                        found.push(ReportViolation::DuplicateWrite {
                            writer: writer.task,
                            value: writer.value,
                        });
                    }
                    seen.push(k);
                }
                _ => found.push(ReportViolation::ImpossibleValue {
                    task: writer.task,
                    value: writer.value,
                }),
            }
        }
    }

    fn check_reads(&self, found: &mut Vec<ReportViolation>) {
        let writes = self.writers().count() as i64;
        for reader in self.readers() {
            let k = match self.writes_before(reader.value) {
                Some(k) if k <= writes => k,
                _ => {
                    found.push(ReportViolation::ImpossibleValue {
                        task: reader.task,
                        value: reader.value,
                    });
                    continue;
                }
            };

            // Writers that must have finished before, or started after, this read
            let before = self
                .writers()
                .filter(|w| w.released_at < reader.admitted_at)
                .count() as i64;
            let after = self
                .writers()
                .filter(|w| w.admitted_at > reader.released_at)
                .count() as i64;
            let max = writes - after;

            if k < before || k > max {
                found.push(ReportViolation::StaleRead {
                    reader: reader.task,
                    value: reader.value,
                    min: self.value_after(before).unwrap_or(i64::MIN),
                    max: self.value_after(max).unwrap_or(i64::MAX),
                });
            }
        }
    }

    /// Value after `k` completed writes
    fn value_after(&self, k: i64) -> Option<i64> {
        self.write_delta
            .checked_mul(k)
            .and_then(|d| self.initial_value.checked_add(d))
    }

    /// How many writes produce `value`, if any whole number does
    fn writes_before(&self, value: i64) -> Option<i64> {
        if self.write_delta == 0 {
            return (value == self.initial_value).then_some(0);
        }
        let diff = value.checked_sub(self.initial_value)?;
        if diff.checked_rem(self.write_delta)? != 0 {
            return None;
        }
        let k = diff.checked_div(self.write_delta)?;
        (k >= 0).then_some(k)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>12} {:>12} {:>12} {:>8}",
            "TASK", "REQUESTED", "ADMITTED", "RELEASED", "VALUE"
        )?;
        let mut windows: Vec<_> = self.windows.iter().collect();
        windows.sort_by_key(|w| w.admitted_at);
        for w in windows {
            writeln!(
                f,
                "{:<10} {:>10}ms {:>10}ms {:>10}ms {:>8}",
                w.task.to_string(),
                w.requested_at.as_millis(),
                w.admitted_at.as_millis(),
                w.released_at.as_millis(),
                w.value
            )?;
        }
        for a in &self.aborted {
            writeln!(f, "{:<10} aborted: {}", a.task.to_string(), a.reason)?;
        }
        write!(
            f,
            "final value: {} (initial {}, {} writes of {})",
            self.final_value,
            self.initial_value,
            self.writers().count(),
            self.write_delta
        )
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
