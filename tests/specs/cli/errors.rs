//! Error reporting specs
//!
//! Configuration problems exit non-zero before any task runs.

use crate::prelude::*;

#[test]
fn no_tasks_is_rejected() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--readers", "0", "--writers", "0"])
        .fails()
        .stderr_has("at least one reader or writer is required");
}

#[test]
fn zero_delta_is_rejected() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--delta", "0"])
        .fails()
        .stderr_has("write_delta must be non-zero");
}

#[test]
fn missing_config_file_is_reported() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--config", "nope.toml"])
        .fails()
        .stderr_has("failed to read");
}

#[test]
fn unknown_config_key_is_reported() {
    let temp = Project::empty();
    temp.file("run.toml", "readers = 3\n");

    temp.rwgate()
        .args(&["--config", "run.toml"])
        .fails()
        .stderr_has("failed to parse");
}

#[test]
fn malformed_duration_is_rejected() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--timeout", "soon"])
        .fails()
        .stderr_has("invalid value");
}
