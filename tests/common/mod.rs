//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test device context
///
/// Creates a temporary directory standing in for the device's partitions
/// and provides utilities for setting up test scenarios. The partitions live
/// under `system/`, `cache/` and `data/`; a `utilities.toml` pointing at them
/// is written by [`TestDevice::write_settings`].
pub struct TestDevice {
    /// Temporary directory for the test device
    pub dir: TempDir,
}

impl TestDevice {
    /// Create a new test device in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test device directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test device
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test device
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Create a symlink in the test device
    pub fn create_symlink(&self, target: &str, name: &str) {
        std::os::unix::fs::symlink(target, self.dir.path().join(name))
            .expect("Failed to create symlink");
    }

    /// Check if a file exists in the test device
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Install a ROM by creating its system directory and naming it
    pub fn install_rom(&self, id: &str, system_dir: &str, name: &str) {
        self.create_dir(system_dir);
        self.create_file(
            &format!("MultiBoot/{id}/config.json"),
            &format!(r#"{{"name": "{name}"}}"#),
        );
    }

    /// Write `utilities.toml` pointing every directory into the test device
    pub fn write_settings(&self, extra: &str) {
        let root = self.path();
        let settings = format!(
            r#"{extra}
[properties]
files = ["{root}/default.prop"]

[partitions]
system = "{root}/system"
cache = "{root}/cache"
data = "{root}/data"

[multiboot]
data_dir = "{root}/data/multiboot"
config_dir = "{root}/MultiBoot"
"#,
            root = root.display()
        );
        self.create_file("utilities.toml", &settings);
    }

    /// Run mbutils against this device's settings
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_mbutils"))
            .current_dir(self.path())
            .env("MBUTILS_CONFIG", self.path().join("utilities.toml"))
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute mbutils")
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Run mbutils without any settings file
pub fn run_mbutils(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mbutils"))
        .env("MBUTILS_CONFIG", "/nonexistent/utilities.toml")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute mbutils")
}

/// Sample device catalog whose only boot partition does not exist
pub const SAMPLE_DEVICES: &str = r#"[
    {
        "id": "testdev",
        "codenames": ["testdev"],
        "name": "Test Device",
        "architecture": "arm64-v8a",
        "block_devs": {
            "base_dirs": ["/dev/block/by-name"],
            "boot": ["/dev/block/nonexistent"]
        }
    }
]"#;
