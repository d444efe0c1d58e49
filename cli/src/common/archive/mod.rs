//! # SevenRS Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Everything SevenRS knows about the external 7z archiver:
//!
//! - **`candidates`**: Builds the ordered, deduplicated list of executables to try.
//! - **`sevenzip`**: Turns extract/compress requests into 7z arguments and runs them
//!   with fallback across candidates.
//! - **`mime`**: Static extension-to-MIME table for labelling extracted files.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{candidates, sevenzip};
//! # async fn run(archive: &std::path::Path, out: &std::path::Path) -> anyhow::Result<()> {
//! let bins = candidates::build_candidates(None);
//! sevenzip::extract_full(&bins, archive, out, None, std::time::Duration::from_secs(30)).await?;
//! # Ok(())
//! # }
//! ```
//!

pub mod candidates;
pub mod mime;
pub mod sevenzip;
