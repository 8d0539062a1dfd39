//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Flags that make a run finish immediately
pub const IMMEDIATE: &[&str] = &["--spawn-delay", "0s", "--work-delay", "0s"];

/// Scratch directory for config and log files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` inside the project and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn rwgate(&self) -> CliBuilder {
        CliBuilder::new(self.dir.path())
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(cwd: &Path) -> Self {
        let mut cmd = Command::cargo_bin("rwgate").unwrap();
        cmd.current_dir(cwd).env_remove("RUST_LOG");
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and assert exit code 0
    pub fn passes(mut self) -> RunAssert {
        RunAssert::new(self.cmd.assert().success())
    }

    /// Run and assert a non-zero exit code
    pub fn fails(mut self) -> RunAssert {
        RunAssert::new(self.cmd.assert().failure())
    }
}

pub struct RunAssert {
    assert: assert_cmd::assert::Assert,
}

impl RunAssert {
    fn new(assert: assert_cmd::assert::Assert) -> Self {
        Self { assert }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {expected:?}:\n{stdout}"
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly has {unexpected:?}:\n{stdout}"
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {expected:?}:\n{stderr}"
        );
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
