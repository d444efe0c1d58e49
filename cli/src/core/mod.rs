//! # SevenRS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by every command:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `item`: Pipeline item and binary payload types exchanged with the host
//!
//! ```rust
//! use crate::core::config::{self, ArchiveConfig};
//! use crate::core::error::{ArchiveError, Result};
//! use crate::core::item::PipelineItem;
//! ```
//!
pub mod config;
pub mod error;
pub mod item;
