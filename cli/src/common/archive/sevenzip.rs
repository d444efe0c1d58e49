//! # SevenRS 7z Invocations (`common::archive::sevenzip`)
//!
//! File: cli/src/common/archive/sevenzip.rs
//!
//! ## Overview
//!
//! Translates an archive operation into 7z command-line arguments and runs it
//! through `common::process::run_with_fallback`. The archiver itself is an
//! external executable; nothing here reads or writes the 7z format.
//!
//! ## 7z Commands Reference
//!
//! - Extract all, keeping paths: `7z x <archive> -o<dir> -y [-p<password>]`
//! - Add files: `7z a <archive> <dir>/* -y [-p<password>]`
//!
//! `-y` answers yes to all prompts. Standard input is closed, so an encrypted
//! archive opened without a password fails instead of waiting on a prompt.
//!
use crate::common::process::{run_with_fallback, CommandSpec, RunOutcome};
use crate::core::error::Result;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Extracts `archive` into `output_dir` using the first working candidate.
pub async fn extract_full(
    candidates: &[String],
    archive: &Path,
    output_dir: &Path,
    password: Option<&str>,
    timeout: Duration,
) -> Result<RunOutcome> {
    let spec = CommandSpec::new(
        "7z extraction",
        extract_args(archive, output_dir, password),
        timeout,
    );
    run_with_fallback(candidates, &spec).await
}

/// Creates `archive` from everything under `staging_root`.
pub async fn add_all(
    candidates: &[String],
    archive: &Path,
    staging_root: &Path,
    password: Option<&str>,
    timeout: Duration,
) -> Result<RunOutcome> {
    let spec = CommandSpec::new(
        "7z compression",
        add_args(archive, staging_root, password),
        timeout,
    );
    run_with_fallback(candidates, &spec).await
}

fn extract_args(archive: &Path, output_dir: &Path, password: Option<&str>) -> Vec<OsString> {
    let mut output_switch = OsString::from("-o");
    output_switch.push(output_dir);
    let mut args = vec![
        OsString::from("x"),
        archive.as_os_str().to_owned(),
        output_switch,
        OsString::from("-y"),
    ];
    args.extend(password_switch(password));
    args
}

fn add_args(archive: &Path, staging_root: &Path, password: Option<&str>) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("a"),
        archive.as_os_str().to_owned(),
        staging_root.join("*").into_os_string(),
        OsString::from("-y"),
    ];
    args.extend(password_switch(password));
    args
}

fn password_switch(password: Option<&str>) -> Option<OsString> {
    password
        .filter(|p| !p.is_empty())
        .map(|p| OsString::from(format!("-p{}", p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_args_with_password() {
        let args = extract_args(
            Path::new("/tmp/w/archive.7z"),
            Path::new("/tmp/w/extracted"),
            Some("pw"),
        );
        assert_eq!(
            args,
            vec![
                OsString::from("x"),
                OsString::from("/tmp/w/archive.7z"),
                OsString::from("-o/tmp/w/extracted"),
                OsString::from("-y"),
                OsString::from("-ppw"),
            ]
        );
    }

    #[test]
    fn test_add_args_glob_over_staging_root() {
        let staging = PathBuf::from("/tmp/w/files");
        let args = add_args(Path::new("/tmp/w/out.7z"), &staging, None);
        assert_eq!(args[0], OsString::from("a"));
        assert_eq!(args[2], staging.join("*").into_os_string());
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_empty_password_adds_no_switch() {
        assert!(password_switch(Some("")).is_none());
        assert!(password_switch(None).is_none());
    }
}
