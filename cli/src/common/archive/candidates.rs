//! # SevenRS Archiver Candidates (`common::archive::candidates`)
//!
//! File: cli/src/common/archive/candidates.rs
//!
//! Builds the ordered list of 7z executables the process runner will try.
//!
//! Order:
//! 1. The custom path from configuration, when set
//! 2. The bundled binary at `<exe dir>/bin/7za` (`7za.exe` on Windows)
//! 3. The bare name `7z`, resolved through `PATH`
//! 4. OS-standard install locations
//!
//! Existence is not checked here; a missing candidate simply fails its
//! attempt and the runner moves on.
//!
use std::path::PathBuf;

/// Name looked up through `PATH` when nothing better is available.
pub const PATH_FALLBACK: &str = "7z";

#[cfg(windows)]
const BUNDLED_NAME: &str = "7za.exe";
#[cfg(not(windows))]
const BUNDLED_NAME: &str = "7za";

#[cfg(windows)]
const SYSTEM_FALLBACKS: &[&str] = &[r"C:\Program Files\7-Zip\7z.exe"];
#[cfg(not(windows))]
const SYSTEM_FALLBACKS: &[&str] = &["/usr/bin/7z", "/usr/bin/7za"];

/// Absolute path of the archiver shipped next to the running executable.
pub fn bundled_binary_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("bin").join(BUNDLED_NAME))
}

/// Resolves candidates for the given custom path. Never empty.
pub fn build_candidates(custom_path: Option<&str>) -> Vec<String> {
    let bundled = bundled_binary_path().map(|p| p.to_string_lossy().into_owned());
    let mut ordered = Vec::new();
    ordered.extend(custom_path.map(str::trim).map(str::to_string));
    ordered.extend(bundled);
    ordered.push(PATH_FALLBACK.to_string());
    ordered.extend(SYSTEM_FALLBACKS.iter().map(|s| s.to_string()));
    dedup_first(ordered)
}

/// Drops empty entries and later duplicates, keeping first-occurrence order.
pub fn dedup_first(candidates: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_path_first_and_unique() {
        let list = build_candidates(Some("/x/7z"));
        assert_eq!(list[0], "/x/7z");
        assert!(list.contains(&PATH_FALLBACK.to_string()));
        let mut seen = std::collections::HashSet::new();
        assert!(list.iter().all(|c| seen.insert(c.clone())));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let list = dedup_first(vec![
            "/x/7z".into(),
            "7z".into(),
            "".into(),
            "/usr/bin/7z".into(),
            "7z".into(),
            "/x/7z".into(),
        ]);
        assert_eq!(list, vec!["/x/7z", "7z", "/usr/bin/7z"]);
    }

    #[test]
    fn test_no_custom_path_still_non_empty() {
        let list = build_candidates(None);
        assert!(!list.is_empty());
        assert!(list.iter().all(|c| !c.is_empty()));
        let fallback_pos = list.iter().position(|c| c == PATH_FALLBACK).unwrap();
        for system in SYSTEM_FALLBACKS {
            let pos = list.iter().position(|c| c == system).unwrap();
            assert!(pos > fallback_pos);
        }
    }

    #[test]
    fn test_blank_custom_path_ignored() {
        assert_eq!(build_candidates(Some("  ")), build_candidates(None));
    }

    #[test]
    fn test_custom_path_matching_fallback_is_not_repeated() {
        let list = build_candidates(Some("7z"));
        assert_eq!(list[0], "7z");
        assert_eq!(list.iter().filter(|c| *c == "7z").count(), 1);
    }
}
