//! # SevenRS Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the `extract` and `compress` commands. This
//! keeps command-specific logic (`commands::`) separate from the reusable
//! pieces that deal with the outside world.
//!
//! - **`archive`**: The external 7z archiver: candidate resolution, invocation arguments, MIME table.
//! - **`fs`**: Workspaces, byte-level file I/O, and harvesting of extracted trees.
//! - **`process`**: Running an external command across fallback candidates with a timeout.
//!

/// 7z candidate resolution, invocation and MIME lookup.
pub mod archive;
/// Workspaces, file I/O and extraction harvesting.
pub mod fs;
/// External process execution with ordered fallback and timeout.
pub mod process;
