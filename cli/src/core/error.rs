//! # SevenRS Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout SevenRS. Every failure
//! that reaches the user names its original cause; temporary files are already
//! gone by the time an error is reported, so the message has to stand on its own.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ArchiveError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Missing input data (binary property or compression source field)
//! - Archiver invocation failures (every binary candidate failed or timed out)
//! - Filesystem failures (workspace create/remove, file read/write)
//! - Batch item failures (any of the above, tagged with the item index)
//! - Configuration errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! return Err(ArchiveError::MissingSource { field: "notes".into() })?;
//!
//! // Add context to I/O errors using anyhow
//! let bytes = tokio::fs::read(&path)
//!     .await
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for SevenRS.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No binary data found in property \"{property}\"")]
    MissingBinary { property: String },

    #[error("No data found in property \"{field}\"")]
    MissingSource { field: String },

    #[error("No files specified for compression")]
    NothingToCompress,

    #[error("Unable to read binary data from property \"{property}\": {reason}")]
    PayloadDecode { property: String, reason: String },

    /// Every archiver candidate failed. The message is the last candidate's
    /// failure reason, verbatim.
    #[error("{last}")]
    ArchiverInvocation { attempts: usize, last: String },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Path '{path}' escapes the {root} directory")]
    PathEscape { path: String, root: &'static str },

    #[error("Item {index}: {message}")]
    BatchItem { index: usize, message: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
