// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for run reports

use clap::ValueEnum;
use rwgate_core::{ReportViolation, RunReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Report plus its verification outcome, as printed
#[derive(Serialize)]
pub struct RunSummary<'a> {
    #[serde(flatten)]
    pub report: &'a RunReport,
    pub verified: bool,
    #[serde(serialize_with = "as_messages")]
    pub violations: &'a [ReportViolation],
}

fn as_messages<S: serde::Serializer>(
    violations: &&[ReportViolation],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(violations.iter().map(ToString::to_string))
}

impl std::fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.report)?;
        writeln!(f, "longest wait: {:?}", self.report.max_wait())?;
        if self.verified {
            write!(f, "verified: ok")
        } else {
            write!(f, "verified: FAILED ({} violations)", self.violations.len())
        }
    }
}

/// Print output in the specified format
pub fn print<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}
