//! # SevenRS Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the file I/O SevenRS performs inside a workspace:
//! creating directories, writing staged files, reading produced archives, and
//! checking that user-supplied relative paths stay inside their root.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; errors if the path is a file.
//! - **`write_bytes_to_file`**: Writes bytes, creating the parent directory first.
//! - **`read_file_bytes`**: Reads a whole file with contextual errors.
//! - **`contained_path`**: Joins a relative path onto a root, rejecting absolute
//!   paths and `..` components.
//!
//! Reads and writes go through `tokio::fs` so they are awaited on the
//! operation's task.
//!
use crate::core::error::{ArchiveError, Result};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            debug!("Directory already exists: {:?}", path);
            Ok(())
        }
        Ok(_) => anyhow::bail!(ArchiveError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        ))),
        Err(_) => {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory {:?}", path))?;
            debug!("Created directory: {:?}", path);
            Ok(())
        }
    }
}

/// Writes bytes to `path`, overwriting it, after creating its parent directory.
pub async fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent).await?;
    }
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to file: {:?}", content.len(), path);
    Ok(())
}

/// Reads the entire content of a file.
pub async fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .await
        .with_context(|| format!("Failed to read file {:?}", path))
}

/// Resolves `relative` under `root`, refusing anything that would land outside it.
///
/// `root_label` names the root in the error message (e.g. `staging`).
pub fn contained_path(root: &Path, relative: &str, root_label: &'static str) -> Result<PathBuf> {
    let candidate = Path::new(relative);
    let escapes = relative.trim().is_empty()
        || candidate.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        anyhow::bail!(ArchiveError::PathEscape {
            path: relative.to_string(),
            root: root_label,
        });
    }
    Ok(root.join(candidate))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir).await?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        std::fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_then_read_bytes() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("deep/er/test.bin");
        write_bytes_to_file(&file_path, &[0, 159, 146, 150]).await?;
        assert_eq!(read_file_bytes(&file_path).await?, vec![0, 159, 146, 150]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let base_dir = tempdir().unwrap();
        assert!(read_file_bytes(&base_dir.path().join("nope")).await.is_err());
    }

    #[test]
    fn test_contained_path() {
        let root = Path::new("/work/files");
        assert_eq!(
            contained_path(root, "a/b.txt", "staging").unwrap(),
            root.join("a/b.txt")
        );
        assert_eq!(
            contained_path(root, "./c.txt", "staging").unwrap(),
            root.join("./c.txt")
        );
        for bad in ["../x", "a/../../x", "/etc/passwd", "", "  "] {
            let err = contained_path(root, bad, "staging").unwrap_err();
            assert!(err.to_string().contains("escapes the staging directory"), "{}", bad);
        }
    }
}
