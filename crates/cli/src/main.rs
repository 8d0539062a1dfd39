// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rwgate - run readers and writers against a writer-priority gate

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod logging;
mod output;

use anyhow::{bail, Result};
use clap::Parser;
use rwgate_core::{CancelToken, Driver, RunConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, warn};

use crate::output::{OutputFormat, RunSummary};

#[derive(Parser)]
#[command(
    name = "rwgate",
    version,
    about = "Run concurrent readers and writers through a writer-priority gate"
)]
struct Cli {
    /// TOML run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of reader tasks
    #[arg(long)]
    readers: Option<u32>,

    /// Number of writer tasks
    #[arg(long)]
    writers: Option<u32>,

    /// Upper bound of the random pause between spawns (e.g. 250ms)
    #[arg(long, value_parser = humantime::parse_duration)]
    spawn_delay: Option<Duration>,

    /// Upper bound of the random time spent reading or writing
    #[arg(long, value_parser = humantime::parse_duration)]
    work_delay: Option<Duration>,

    /// Amount each writer adds to the shared value
    #[arg(long, allow_negative_numbers = true)]
    delta: Option<i64>,

    /// Starting shared value
    #[arg(long, allow_negative_numbers = true)]
    initial: Option<i64>,

    /// Give up on admission after waiting this long
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Log every protocol step
    #[arg(long, short)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(n) = self.readers {
            config.reader_count = n;
        }
        if let Some(n) = self.writers {
            config.writer_count = n;
        }
        if let Some(d) = self.spawn_delay {
            config.spawn_delay = d;
        }
        if let Some(d) = self.work_delay {
            config.work_delay = d;
        }
        if let Some(delta) = self.delta {
            config.write_delta = delta;
        }
        if let Some(value) = self.initial {
            config.initial_value = value;
        }
        if self.timeout.is_some() {
            config.timeout = self.timeout;
        }
        config.verbose |= self.verbose;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.run_config()?;
    let _log_guard = logging::setup_logging(config.verbose, cli.log_file.as_deref())?;

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupted, cancelling waiting tasks");
        on_interrupt.cancel();
    })?;

    let report = Driver::new(config).run(&cancel)?;
    let violations = report.violations();
    output::print(
        &RunSummary {
            report: &report,
            verified: violations.is_empty(),
            violations: &violations,
        },
        cli.format,
    );

    if !violations.is_empty() {
        for violation in &violations {
            error!(%violation, "verification failed");
        }
        bail!("run failed verification ({} violations)", violations.len());
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
