//! Run output specs
//!
//! Verify the timeline, verdict and logging of a completed run.

use crate::prelude::*;

#[test]
fn default_run_ends_at_fifteen() {
    let temp = Project::empty();

    temp.rwgate()
        .args(IMMEDIATE)
        .passes()
        .stdout_has("TASK")
        .stdout_has("writer2")
        .stdout_has("reader4")
        .stdout_has("final value: 15 (initial 0, 3 writes of 5)")
        .stdout_has("verified: ok");
}

#[test]
fn json_output_carries_verdict() {
    let temp = Project::empty();

    let json = temp
        .rwgate()
        .args(IMMEDIATE)
        .args(&["--format", "json"])
        .passes()
        .stdout_json();

    assert_eq!(json["final_value"], 15);
    assert_eq!(json["verified"], true);
    assert_eq!(json["windows"].as_array().unwrap().len(), 8);
    assert!(json["violations"].as_array().unwrap().is_empty());
}

#[test]
fn negative_delta_counts_down() {
    let temp = Project::empty();

    temp.rwgate()
        .args(IMMEDIATE)
        .args(&["--writers", "4", "--delta", "-2", "--initial", "10"])
        .passes()
        .stdout_has("final value: 2 (initial 10, 4 writes of -2)");
}

#[test]
fn readers_only_run_never_changes_value() {
    let temp = Project::empty();

    temp.rwgate()
        .args(IMMEDIATE)
        .args(&["--writers", "0", "--readers", "3"])
        .passes()
        .stdout_has("final value: 0")
        .stdout_lacks("writer0");
}

#[test]
fn verbose_logs_protocol_steps() {
    let temp = Project::empty();

    temp.rwgate()
        .args(IMMEDIATE)
        .args(&["--verbose", "--readers", "1", "--writers", "0"])
        .passes()
        .stderr_has("wants to read")
        .stderr_has("first reader, taking data gate")
        .stderr_has("last reader, releasing data gate");
}

#[test]
fn quiet_logs_only_values() {
    let temp = Project::empty();

    let run = temp
        .rwgate()
        .args(IMMEDIATE)
        .passes()
        .stderr_has("writers are done")
        .stderr_has("readers are done");

    assert!(!run.stderr().contains("wants to read"));
}

#[test]
fn rust_log_overrides_verbosity() {
    let temp = Project::empty();

    let run = temp
        .rwgate()
        .env("RUST_LOG", "warn")
        .args(IMMEDIATE)
        .args(&["--verbose"])
        .passes();

    assert!(!run.stderr().contains("starting run"));
}

#[test]
fn log_file_receives_logs() {
    let temp = Project::empty();

    let run = temp
        .rwgate()
        .args(IMMEDIATE)
        .args(&["--log-file", "logs/run.log"])
        .passes();

    let logs = std::fs::read_to_string(temp.path().join("logs/run.log")).unwrap();
    assert!(logs.contains("run finished"));
    assert!(!run.stderr().contains("run finished"));
}
