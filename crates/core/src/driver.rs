// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task driver: spawns readers and writers against one coordinator
//!
//! Writers and readers are spawned by two concurrent spawner threads, each
//! pausing between spawns. Every task makes exactly one admission request,
//! performs its work while admitted, and records its window for the report.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, RunConfig};
use crate::coordinator::Coordinator;
use crate::id::TaskId;
use crate::report::{AbortedTask, AccessWindow, RunReport};
use crate::wait::{CancelToken, WaitOptions};
use crate::work::{RandomDelay, TracedWork, Work};
use std::sync::Mutex;
use std::thread::{self, Scope};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct Driver<C: Clock = SystemClock> {
    config: RunConfig,
    clock: C,
    spawn_pause: Box<dyn Work>,
    read_work: Box<dyn Work>,
    write_work: Box<dyn Work>,
}

/// State shared by all tasks of one run
struct Run<'a> {
    coordinator: Coordinator<i64>,
    start: Instant,
    cancel: &'a CancelToken,
    windows: Mutex<Vec<AccessWindow>>,
    aborted: Mutex<Vec<AbortedTask>>,
}

impl Run<'_> {
    fn record(&self, window: AccessWindow) {
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(window);
    }

    fn abort(&self, task: TaskId, reason: impl Into<String>) {
        self.aborted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(AbortedTask {
                task,
                reason: reason.into(),
            });
    }
}

impl Driver<SystemClock> {
    pub fn new(config: RunConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Driver<C> {
    /// Driver with random delays taken from `config`
    pub fn with_clock(config: RunConfig, clock: C) -> Self {
        let work = RandomDelay::up_to(config.work_delay);
        Self {
            spawn_pause: Box::new(RandomDelay::up_to(config.spawn_delay)),
            read_work: Box::new(TracedWork::new("read", work)),
            write_work: Box::new(TracedWork::new("write", work)),
            config,
            clock,
        }
    }

    pub fn with_spawn_pause(mut self, work: impl Work + 'static) -> Self {
        self.spawn_pause = Box::new(work);
        self
    }

    pub fn with_read_work(mut self, work: impl Work + 'static) -> Self {
        self.read_work = Box::new(TracedWork::new("read", work));
        self
    }

    pub fn with_write_work(mut self, work: impl Work + 'static) -> Self {
        self.write_work = Box::new(TracedWork::new("write", work));
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every task to completion (or abort) and report what happened
    pub fn run(&self, cancel: &CancelToken) -> Result<RunReport, ConfigError> {
        self.config.validate()?;
        info!(
            readers = self.config.reader_count,
            writers = self.config.writer_count,
            initial_value = self.config.initial_value,
            "starting run"
        );

        let run = Run {
            coordinator: Coordinator::new(self.config.initial_value),
            start: self.clock.now(),
            cancel,
            windows: Mutex::new(Vec::new()),
            aborted: Mutex::new(Vec::new()),
        };

        thread::scope(|s| {
            let run = &run;
            s.spawn(move || {
                self.spawn_group(s, run, self.config.writer_count, TaskId::Writer);
                info!("writers are done");
            });
            s.spawn(move || {
                self.spawn_group(s, run, self.config.reader_count, TaskId::Reader);
                info!("readers are done");
            });
        });

        let mut windows = run.windows.into_inner().unwrap_or_else(|e| e.into_inner());
        windows.sort_by_key(|w| w.admitted_at);
        let aborted = run.aborted.into_inner().unwrap_or_else(|e| e.into_inner());
        let final_value = run.coordinator.into_inner();

        info!(final_value, aborted = aborted.len(), "run finished");
        Ok(RunReport {
            initial_value: self.config.initial_value,
            write_delta: self.config.write_delta,
            final_value,
            windows,
            aborted,
        })
    }

    /// Spawn `count` tasks one after another, then wait for all of them
    fn spawn_group<'scope, 'env>(
        &'env self,
        s: &'scope Scope<'scope, 'env>,
        run: &'env Run<'env>,
        count: u32,
        make_id: fn(u32) -> TaskId,
    ) {
        let mut handles = Vec::new();
        for n in 0..count {
            let id = make_id(n);
            if run.cancel.is_cancelled() {
                run.abort(id, "cancelled before start");
                continue;
            }
            let handle = s.spawn(move || self.run_task(run, id));
            handles.push((id, handle));
            self.spawn_pause.perform();
        }

        for (id, handle) in handles {
            if handle.join().is_err() {
                error!(task = %id, "task panicked");
                run.abort(id, "panicked while admitted");
            }
        }
    }

    fn run_task(&self, run: &Run<'_>, id: TaskId) {
        let opts = self.wait_options(run.cancel);
        let requested_at = self.offset(run.start);

        let window = match id {
            TaskId::Reader(_) => run.coordinator.begin_read_with(id, &opts).map(|guard| {
                let admitted_at = self.offset(run.start);
                let value = *guard;
                info!(task = %id, value, "read");
                self.read_work.perform();
                let released_at = self.offset(run.start);
                guard.end();
                (admitted_at, released_at, value)
            }),
            TaskId::Writer(_) => run.coordinator.begin_write_with(id, &opts).map(|mut guard| {
                let admitted_at = self.offset(run.start);
                *guard = guard.saturating_add(self.config.write_delta);
                let value = *guard;
                info!(task = %id, value, "wrote");
                self.write_work.perform();
                let released_at = self.offset(run.start);
                guard.end();
                (admitted_at, released_at, value)
            }),
        };

        match window {
            Ok((admitted_at, released_at, value)) => run.record(AccessWindow {
                task: id,
                requested_at,
                admitted_at,
                released_at,
                value,
            }),
            Err(e) => {
                warn!(task = %id, error = %e, "not admitted");
                run.abort(id, e.to_string());
            }
        }
    }

    fn wait_options(&self, cancel: &CancelToken) -> WaitOptions {
        let opts = match self.config.timeout {
            Some(timeout) => WaitOptions::timeout(timeout),
            None => WaitOptions::unbounded(),
        };
        opts.cancel_on(cancel.clone())
    }

    fn offset(&self, start: Instant) -> Duration {
        self.clock.now().saturating_duration_since(start)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
