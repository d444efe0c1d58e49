//! # SevenRS Compress Operation
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! Implements `sevenrs compress`: builds one 7z archive from fields of an
//! input item and returns it as a single output item.
//!
//! ## Architecture
//!
//! 1. Acquire a `7z-compress-` workspace
//! 2. Stage every configured entry as a real file under `files/`. Content comes
//!    from the item's binary property of that name, else its JSON field
//! 3. Run `7z a <archive> files/*` across the resolved candidates
//! 4. Read the archive back and map it to the output record
//! 5. Release the workspace, whatever happened
//!
//! Staging finishes before the archiver runs, so an entry with no source
//! fails the item without producing an archive.
//!
use crate::commands::{mapper, ArchiveOperation};
use crate::common::archive::sevenzip;
use crate::common::fs::{
    io::{contained_path, read_file_bytes, write_bytes_to_file},
    workspace::Workspace,
};
use crate::core::config::CompressionEntry;
use crate::core::error::{ArchiveError, Result};
use crate::core::item::PipelineItem;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info};

const WORKSPACE_PREFIX: &str = "7z-compress-";
const STAGING_DIR_NAME: &str = "files";

/// Compresses the configured entries of one item into an archive.
pub async fn compress_item(op: &ArchiveOperation<'_>) -> Result<PipelineItem> {
    let config = op.config;
    if config.files_to_compress.is_empty() {
        anyhow::bail!(ArchiveError::NothingToCompress);
    }

    let workspace = Workspace::acquire(
        config.workspace_root.as_deref(),
        WORKSPACE_PREFIX,
        &config.archive_name,
        STAGING_DIR_NAME,
    )
    .await?;
    let outcome = compress_in(op, &workspace).await;
    workspace.release();
    outcome.context("Failed to create 7z archive")
}

async fn compress_in(op: &ArchiveOperation<'_>, workspace: &Workspace) -> Result<PipelineItem> {
    let config = op.config;
    let staged = stage_entries(workspace.work_dir(), &config.files_to_compress, op.item).await?;

    let run = sevenzip::add_all(
        &op.candidates,
        workspace.archive_path(),
        workspace.work_dir(),
        config.password.as_deref(),
        config.timeout,
    )
    .await?;

    let archive = read_file_bytes(workspace.archive_path()).await?;
    info!(
        "Item {}: created {} ({} bytes, {} file(s)) with {}",
        op.item_index,
        config.archive_name,
        archive.len(),
        staged,
        run.program
    );
    Ok(mapper::compression_record(
        &config.archive_name,
        &archive,
        staged,
    ))
}

/// Writes each entry's content to its `file_name` under `staging_root`.
///
/// Returns the number of entries staged.
pub async fn stage_entries(
    staging_root: &Path,
    entries: &[CompressionEntry],
    item: &PipelineItem,
) -> Result<usize> {
    for entry in entries {
        let content = resolve_source(item, &entry.data_property)?;
        let target = contained_path(staging_root, &entry.file_name, "staging")?;
        write_bytes_to_file(&target, &content).await?;
        debug!(
            "Staged {} from '{}' ({} bytes)",
            entry.file_name,
            entry.data_property,
            content.len()
        );
    }
    Ok(entries.len())
}

/// Binary property first, then the JSON field.
fn resolve_source(item: &PipelineItem, field: &str) -> Result<Vec<u8>> {
    if item.has_binary(field) {
        return item.binary_bytes(field);
    }
    item.text_bytes(field).ok_or_else(|| {
        ArchiveError::MissingSource {
            field: field.to_string(),
        }
        .into()
    })
}
