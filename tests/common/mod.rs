//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Fake `cmake` that echoes and records its arguments
///
/// Fails with exit code 3 when its arguments contain `$FAKE_CMAKE_FAIL`.
#[allow(dead_code)]
const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "fake-cmake $*"
echo "fake-cmake $*" >> "$FAKE_CMAKE_RECORD"
if [ -n "$FAKE_CMAKE_FAIL" ]; then
  case "$*" in
    *"$FAKE_CMAKE_FAIL"*) echo "fake-cmake: boom" >&2; exit 3 ;;
  esac
fi
exit 0
"#;

/// Test workspace context
///
/// Holds a temporary source directory, workspace directory and a `bin/`
/// directory with a fake `cmake` placed first on `PATH`.
pub struct TestWorkspace {
    /// Temporary root holding everything
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new workspace with a fake cmake installed
    pub fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        std::fs::create_dir_all(ws.source_dir()).expect("Failed to create source dir");
        std::fs::write(
            ws.source_dir().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.10)\nproject(sample)\n",
        )
        .expect("Failed to write CMakeLists.txt");
        ws.install_fake_cmake();
        ws
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root().join("project")
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.root().join("workspace")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    /// File the fake cmake appends its invocations to
    pub fn record_file(&self) -> PathBuf {
        self.root().join("cmake_calls.txt")
    }

    /// Invocations recorded by the fake cmake, one per line
    pub fn cmake_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.record_file())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn build_dir(&self, variant: &str) -> PathBuf {
        self.workspace_dir().join("build").join(variant)
    }

    pub fn install_dir(&self, variant: &str) -> PathBuf {
        self.workspace_dir().join("install").join(variant)
    }

    pub fn log_file(&self, variant: &str) -> PathBuf {
        self.build_dir(variant).join("build_log.txt")
    }

    pub fn read_log(&self, variant: &str) -> String {
        std::fs::read_to_string(self.log_file(variant)).expect("Failed to read build log")
    }

    #[cfg(unix)]
    fn install_fake_cmake(&self) {
        use std::os::unix::fs::PermissionsExt;

        std::fs::create_dir_all(self.bin_dir()).expect("Failed to create bin dir");
        let script = self.bin_dir().join("cmake");
        std::fs::write(&script, FAKE_CMAKE).expect("Failed to write fake cmake");
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).expect("Failed to chmod fake cmake");
    }

    #[cfg(not(unix))]
    fn install_fake_cmake(&self) {
        std::fs::create_dir_all(self.bin_dir()).expect("Failed to create bin dir");
    }

    fn path_env(&self) -> std::ffi::OsString {
        let mut paths = vec![self.bin_dir()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).expect("Failed to build PATH")
    }

    /// Run cmstage against this workspace with extra arguments
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    /// Run cmstage with extra environment variables
    pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cmstage"));
        cmd.current_dir(self.source_dir())
            .env("PATH", self.path_env())
            .env("FAKE_CMAKE_RECORD", self.record_file())
            .env_remove("FAKE_CMAKE_FAIL")
            .env_remove("CMSTAGE_GENERATOR")
            .env_remove("CMSTAGE_JOBS")
            .env_remove("CMSTAGE_VARIANT")
            .env_remove("FBX_LOCATION")
            .env_remove("RUST_LOG")
            .arg(self.workspace_dir());
        for arg in args {
            cmd.arg(arg);
        }
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute cmstage")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether read-only directories actually refuse writes under `scratch`
///
/// False when running as root, where permission bits are bypassed.
#[cfg(unix)]
#[allow(dead_code)]
pub fn permissions_enforced(scratch: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch.join("read-only-check");
    std::fs::create_dir_all(&dir).expect("Failed to create check dir");
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555))
        .expect("Failed to chmod check dir");
    let enforced = std::fs::File::create(dir.join("file")).is_err();
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod check dir");
    std::fs::remove_dir_all(&dir).expect("Failed to remove check dir");
    enforced
}

/// Stdout of a finished process as text
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished process as text
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
