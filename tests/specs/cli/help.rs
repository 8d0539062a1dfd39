//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_run_flags() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--help"])
        .passes()
        .stdout_has("--readers")
        .stdout_has("--writers")
        .stdout_has("--timeout")
        .stdout_has("--format");
}

#[test]
fn version_names_the_binary() {
    let temp = Project::empty();

    temp.rwgate()
        .args(&["--version"])
        .passes()
        .stdout_has("rwgate");
}
