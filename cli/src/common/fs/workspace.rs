//! # SevenRS Operation Workspace (`common::fs::workspace`)
//!
//! File: cli/src/common/fs/workspace.rs
//!
//! ## Overview
//!
//! Every extract or compress operation runs inside its own temporary
//! directory:
//!
//! ```text
//! <root>/7z-extract-XXXXXX/
//! ├── archive.7z      (archive_path)
//! └── extracted/      (work_dir)
//! ```
//!
//! The directory name is generated by `tempfile`, which is what keeps two
//! operations apart; there is no locking.
//!
//! ## Release
//!
//! `Workspace::release` removes the tree and consumes the handle, so it cannot
//! be touched afterwards. If an operation bails out early with `?`, the
//! handle is dropped and `TempDir`'s drop removes the tree instead. Removal
//! failures are logged and swallowed in both paths so they never replace the
//! operation's own error.
//!
use crate::common::fs::io::ensure_dir_exists;
use crate::core::error::{ArchiveError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Exclusively owned scratch directory for one operation.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    archive_path: PathBuf,
    work_dir: PathBuf,
}

impl Workspace {
    /// Creates `<root>/<prefix>XXXXXX` with a `work_dir_name` subdirectory.
    ///
    /// `root` defaults to the system temp directory.
    pub async fn acquire(
        root: Option<&Path>,
        prefix: &str,
        archive_name: &str,
        work_dir_name: &str,
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let created = match root {
            Some(root) => {
                ensure_dir_exists(root).await?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        let dir = created.map_err(|e| {
            ArchiveError::FileSystem(format!("Failed to create temporary workspace: {}", e))
        })?;
        let archive_path = dir.path().join(archive_name);
        let work_dir = dir.path().join(work_dir_name);
        ensure_dir_exists(&work_dir).await?;
        debug!("Acquired workspace {}", dir.path().display());
        Ok(Self {
            dir,
            archive_path,
            work_dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Recursively deletes the workspace. Never fails.
    pub fn release(self) {
        let path = self.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Released workspace {}", path.display()),
            Err(e) => warn!("Failed to remove workspace {}: {}", path.display(), e),
        }
    }
}
