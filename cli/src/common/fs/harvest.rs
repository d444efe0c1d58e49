//! # SevenRS Extraction Harvester (`common::fs::harvest`)
//!
//! File: cli/src/common/fs/harvest.rs
//!
//! ## Overview
//!
//! Collects every regular file under a freshly extracted tree into flat
//! `ExtractedFile` records: path relative to the root (always `/`-separated),
//! full content and byte size. Directories are descended into but never
//! emitted.
//!
//! ## Architecture
//!
//! - The tree is walked depth-first with `walkdir` on a blocking thread.
//!   Order is whatever the directory listing returns; nothing downstream
//!   depends on it, only on path uniqueness.
//! - Symbolic links are neither followed nor emitted, so nothing outside the
//!   root is ever read.
//! - File contents are then read with `tokio::fs`.
//!
use crate::common::fs::io::read_file_bytes;
use crate::core::error::{ArchiveError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One file produced by the archiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub relative_path: String,
    pub data: Vec<u8>,
    pub size: u64,
}

/// Harvests all regular files below `root`.
pub async fn harvest_files(root: &Path) -> Result<Vec<ExtractedFile>> {
    let walk_root = root.to_path_buf();
    let found = tokio::task::spawn_blocking(move || list_regular_files(&walk_root))
        .await
        .context("Directory walk task failed")??;

    let mut files = Vec::with_capacity(found.len());
    for (relative_path, full_path) in found {
        let data = read_file_bytes(&full_path).await?;
        let size = data.len() as u64;
        debug!("Harvested {} ({} bytes)", relative_path, size);
        files.push(ExtractedFile {
            relative_path,
            data,
            size,
        });
    }
    Ok(files)
}

fn list_regular_files(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            ArchiveError::FileSystem(format!("Failed to walk {}: {}", root.display(), e))
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ArchiveError::PathEscape {
                path: entry.path().display().to_string(),
                root: "extraction",
            })?;
        let relative_path = to_slash_path(relative);
        if !file_type.is_file() {
            warn!("Skipping non-regular file in extraction output: {}", relative_path);
            continue;
        }
        found.push((relative_path, entry.into_path()));
    }
    Ok(found)
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
