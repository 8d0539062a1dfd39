//! Config file specs
//!
//! Verify TOML configuration and flag precedence.

use crate::prelude::*;

const SMALL_RUN: &str = r#"
reader_count = 2
writer_count = 2
spawn_delay = "0s"
work_delay = "0s"
write_delta = 3
"#;

#[test]
fn config_file_sets_the_run() {
    let temp = Project::empty();
    temp.file("run.toml", SMALL_RUN);

    temp.rwgate()
        .args(&["--config", "run.toml"])
        .passes()
        .stdout_has("final value: 6 (initial 0, 2 writes of 3)");
}

#[test]
fn flags_override_config_file() {
    let temp = Project::empty();
    temp.file("run.toml", SMALL_RUN);

    temp.rwgate()
        .args(&["--config", "run.toml", "--writers", "4"])
        .passes()
        .stdout_has("final value: 12 (initial 0, 4 writes of 3)");
}

#[test]
fn bounded_wait_run_verifies() {
    let temp = Project::empty();
    let config = temp.file("nested/run.toml", &format!("{SMALL_RUN}timeout = \"10s\"\n"));

    temp.rwgate()
        .args(&["--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("verified: ok");
}
