//! # SevenRS Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used by the archive operations:
//!
//! - **`io`**: Directory creation, byte-level reads and writes, and path containment checks.
//! - **`workspace`**: The per-operation temporary directory with guaranteed removal.
//! - **`harvest`**: Recursive collection of extracted files into flat records.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::{harvest, workspace::Workspace};
//!
//! # async fn run_example() -> crate::core::error::Result<()> {
//! let ws = Workspace::acquire(None, "7z-extract-", "archive.7z", "extracted").await?;
//! let files = harvest::harvest_files(ws.work_dir()).await?;
//! ws.release();
//! # Ok(())
//! # }
//! ```
//!

/// Recursive collection of extracted files (`harvest_files`).
pub mod harvest;
/// Basic file I/O and path containment (`ensure_dir_exists`, `write_bytes_to_file`, `contained_path`).
pub mod io;
/// Per-operation temporary workspaces (`Workspace`).
pub mod workspace;
