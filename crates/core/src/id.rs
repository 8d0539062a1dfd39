// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identifiers
//!
//! Ids only label log lines and report entries; admission never looks at them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the protocol a task is on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
}

/// Identifies a reader or writer task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum TaskId {
    Reader(u32),
    Writer(u32),
}

impl TaskId {
    pub fn kind(&self) -> AccessKind {
        match self {
            TaskId::Reader(_) => AccessKind::Read,
            TaskId::Writer(_) => AccessKind::Write,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Reader(n) => write!(f, "reader{}", n),
            TaskId::Writer(n) => write!(f, "writer{}", n),
        }
    }
}
