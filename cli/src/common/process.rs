//! # SevenRS Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! This module runs an external command given an ordered list of candidate
//! executables. It is the one place SevenRS spawns processes; both extraction
//! and compression go through `run_with_fallback`.
//!
//! ## Architecture
//!
//! - Candidates are tried strictly one at a time, in order.
//! - Each attempt is spawned with `tokio::process::Command` and awaited under
//!   `tokio::time::timeout`.
//! - An attempt succeeds when the process exits with status 0. A spawn error,
//!   a non-zero exit or an expired timer fails the attempt.
//! - A timed-out child is killed (`kill_on_drop`) when its wait future is dropped.
//! - The first success stops the loop. When every candidate fails, the last
//!   failure reason is returned as `ArchiveError::ArchiverInvocation`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{run_with_fallback, CommandSpec};
//! use std::time::Duration;
//!
//! # async fn run_example() -> crate::core::error::Result<()> {
//! let spec = CommandSpec::new("7z extraction", vec!["i".into()], Duration::from_secs(30));
//! let outcome = run_with_fallback(&["7zz".to_string(), "7z".to_string()], &spec).await?;
//! println!("ran {} after {} attempt(s)", outcome.program, outcome.attempts);
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{ArchiveError, Result};
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// What to run, independent of which executable runs it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Short description used in timeout messages, e.g. `7z extraction`.
    pub label: String,
    pub args: Vec<OsString>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(label: impl Into<String>, args: Vec<OsString>, timeout: Duration) -> Self {
        Self {
            label: label.into(),
            args,
            timeout,
        }
    }

    fn timeout_message(&self) -> String {
        let millis = self.timeout.as_millis();
        if millis % 1000 == 0 {
            format!("{} timeout after {} seconds", self.label, millis / 1000)
        } else {
            format!("{} timeout after {} ms", self.label, millis)
        }
    }
}

/// Which candidate finally succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub program: String,
    /// Number of candidates attempted, including the successful one.
    pub attempts: usize,
}

/// Runs `spec` with each candidate in turn until one succeeds.
///
/// ## Errors
///
/// Returns `ArchiveError::ArchiverInvocation` carrying the last candidate's
/// failure reason when no candidate succeeds.
pub async fn run_with_fallback(candidates: &[String], spec: &CommandSpec) -> Result<RunOutcome> {
    let mut last_error = None;
    for (index, program) in candidates.iter().enumerate() {
        debug!(
            "Attempt {}/{}: running {} with {:?}",
            index + 1,
            candidates.len(),
            program,
            redact_args(&spec.args)
        );
        match attempt(program, spec).await {
            Ok(()) => {
                info!("{} succeeded using '{}'", spec.label, program);
                return Ok(RunOutcome {
                    program: program.clone(),
                    attempts: index + 1,
                });
            }
            Err(reason) => {
                warn!("Candidate '{}' failed: {}", program, reason);
                last_error = Some(reason);
            }
        }
    }
    Err(ArchiveError::ArchiverInvocation {
        attempts: candidates.len(),
        last: last_error.unwrap_or_else(|| format!("No executable available for {}", spec.label)),
    }
    .into())
}

async fn attempt(program: &str, spec: &CommandSpec) -> std::result::Result<(), String> {
    let child = Command::new(program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start '{}': {}", program, e))?;

    match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            if detail.is_empty() {
                Err(format!("'{}' exited with {}", program, output.status))
            } else {
                Err(format!(
                    "'{}' exited with {}: {}",
                    program, output.status, detail
                ))
            }
        }
        Ok(Err(e)) => Err(format!("Failed waiting for '{}': {}", program, e)),
        Err(_) => Err(spec.timeout_message()),
    }
}

/// Hides `-p<password>` switches before arguments reach the log.
fn redact_args(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| {
            let s = a.to_string_lossy();
            if s.starts_with("-p") && s.len() > 2 {
                "-p***".to_string()
            } else {
                s.into_owned()
            }
        })
        .collect()
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn spec(args: &[&str], timeout: Duration) -> CommandSpec {
        CommandSpec::new(
            "test run",
            args.iter().map(OsString::from).collect(),
            timeout,
        )
    }

    #[tokio::test]
    async fn test_second_candidate_succeeds_and_third_is_never_tried() {
        let candidates = vec![
            "/nonexistent/sevenrs-first".to_string(),
            "true".to_string(),
            "/nonexistent/sevenrs-third".to_string(),
        ];
        let outcome = run_with_fallback(&candidates, &spec(&[], Duration::from_secs(10)))
            .await
            .unwrap();
        assert_eq!(outcome.program, "true");
        assert_eq!(outcome.attempts, 2);
    }

    #[tokio::test]
    async fn test_all_candidates_fail_surfaces_last_reason() {
        let candidates = vec!["/nonexistent/sevenrs-a".to_string(), "false".to_string()];
        let err = run_with_fallback(&candidates, &spec(&[], Duration::from_secs(10)))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("'false' exited with"), "{}", message);
        assert!(!message.contains("sevenrs-a"));
        assert!(matches!(
            err.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::ArchiverInvocation { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let candidates = vec!["sh".to_string()];
        let err = run_with_fallback(
            &candidates,
            &spec(&["-c", "echo 'ERROR: Wrong password' >&2; exit 2"], Duration::from_secs(10)),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("ERROR: Wrong password"));
    }

    #[tokio::test]
    async fn test_timeout_fails_attempt_and_moves_on() {
        let started = Instant::now();
        let candidates = vec!["sleep".to_string()];
        let err = run_with_fallback(&candidates, &spec(&["5"], Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "test run timeout after 200 ms");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_message_in_seconds() {
        let s = spec(&[], Duration::from_millis(30_000));
        assert_eq!(s.timeout_message(), "test run timeout after 30 seconds");
    }

    #[test]
    fn test_redact_args_hides_password() {
        let args = vec![OsString::from("x"), OsString::from("-psecret")];
        assert_eq!(redact_args(&args), vec!["x", "-p***"]);
    }
}
