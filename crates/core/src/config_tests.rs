// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn defaults_match_demo_program() {
    let config = RunConfig::default();
    assert_eq!(config.reader_count, 5);
    assert_eq!(config.writer_count, 3);
    assert_eq!(config.write_delta, 5);
    assert_eq!(config.spawn_delay, Duration::from_secs(1));
    assert_eq!(config.timeout, None);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_document_yields_defaults() {
    assert_eq!(RunConfig::parse("").unwrap(), RunConfig::default());
}

#[test]
fn parses_humantime_durations() {
    let config = RunConfig::parse(
        r#"
reader_count = 8
writer_count = 2
spawn_delay = "250ms"
work_delay = "2s"
timeout = "30s"
verbose = true
"#,
    )
    .unwrap();

    assert_eq!(config.reader_count, 8);
    assert_eq!(config.writer_count, 2);
    assert_eq!(config.spawn_delay, Duration::from_millis(250));
    assert_eq!(config.work_delay, Duration::from_secs(2));
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    assert!(config.verbose);
    // Unspecified fields keep their defaults
    assert_eq!(config.write_delta, 5);
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(RunConfig::parse("readers = 3").is_err());
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.toml");
    std::fs::write(&path, "writer_count = 1\nwrite_delta = 2\n").unwrap();

    let config = RunConfig::load(&path).unwrap();
    assert_eq!(config.writer_count, 1);
    assert_eq!(config.write_delta, 2);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RunConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_reports_parse_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "reader_count = \"many\"").unwrap();

    let err = RunConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn serializes_back_to_toml() {
    let config = RunConfig::immediate(2, 1).with_timeout(Duration::from_millis(500));
    let text = toml::to_string(&config).unwrap();
    assert_eq!(RunConfig::parse(&text).unwrap(), config);
}

#[parameterized(
    no_tasks = { 0, 0, 5, 0 },
    zero_delta = { 1, 1, 0, 0 },
    overflow = { 0, 2, i64::MAX, 0 },
    overflow_from_initial = { 0, 1, 1, i64::MAX },
)]
fn invalid_configs_are_rejected(readers: u32, writers: u32, delta: i64, initial: i64) {
    let config = RunConfig::immediate(readers, writers)
        .with_write_delta(delta)
        .with_initial_value(initial);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[parameterized(
    readers_only = { 4, 0 },
    writers_only = { 0, 4 },
    mixed = { 5, 3 },
)]
fn valid_configs_pass(readers: u32, writers: u32) {
    assert!(RunConfig::immediate(readers, writers).validate().is_ok());
}
