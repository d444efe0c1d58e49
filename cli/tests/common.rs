//! # SevenRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`extract.rs`, `compress.rs`,
//! `main_tests.rs`). Each test runs the compiled `sevenrs` binary from an empty
//! temporary directory so no project `.sevenrs.toml` is picked up.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use std::path::Path;

/// # Get SevenRS Command (`sevenrs_cmd`)
///
/// Creates an `assert_cmd::Command` for the `sevenrs` binary, running in `cwd`
/// with `RUST_LOG` cleared so log output does not depend on the caller's shell.
pub fn sevenrs_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sevenrs").expect("Failed to find sevenrs binary for testing");
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

/// A pipeline item carrying `bytes` under binary property `property`.
pub fn binary_item(property: &str, bytes: &[u8]) -> Value {
    json!({
        "json": {},
        "binary": { property: { "data": STANDARD.encode(bytes), "fileName": "input.7z" } }
    })
}

pub fn decode(payload: &Value) -> Vec<u8> {
    STANDARD
        .decode(payload["data"].as_str().expect("payload data"))
        .expect("valid base64")
}

/// Writes an executable `sh` script standing in for 7z and returns its path.
#[cfg(unix)]
pub fn fake_archiver(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

/// True when a real `7z` is on PATH.
pub fn has_real_7z() -> bool {
    std::process::Command::new("7z")
        .arg("i")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
