//! # SevenRS Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module holds the two operations SevenRS performs on pipeline items and
//! the batch loop that applies them:
//!
//! - `extract`: Unpack an item's archive into output items
//! - `compress`: Pack item fields into a new archive
//! - `mapper`: Shape results into output items
//!
//! ## Architecture
//!
//! Each input item becomes one `ArchiveOperation`, which carries the item, the
//! immutable configuration and the resolved archiver candidates. Items are
//! processed strictly one after another. A failed item either aborts the batch
//! (`Item <i>: <cause>`) or, with `--continue-on-fail`, is replaced by an
//! `{ "error": <cause> }` record and the loop moves on.
//!
//! ## Examples
//!
//! ```bash
//! # Extract every archive in items.json, one output item per file
//! sevenrs extract --input items.json --output-mode separate
//!
//! # Build bundle.7z from two fields of each item
//! sevenrs compress --file readme.txt=readme --file logo.png=logo --archive-name bundle.7z < items.json
//! ```
//!
use crate::common::archive::candidates::build_candidates;
use crate::core::config::{
    self, ArchiveConfig, CompressionEntry, ConfigLayer, Operation, OutputMode,
};
use crate::core::error::{ArchiveError, Result};
use crate::core::item::{parse_items, PipelineItem};
use anyhow::Context;
use clap::{Args, Parser};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info};

/// Packs configured item fields into a single 7z archive per item.
pub mod compress;
/// Unpacks an item's 7z archive into output items.
pub mod extract;
/// Builds output items from extracted files or a produced archive.
pub mod mapper;

/// Options shared by `extract` and `compress`.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Pipeline items to read (JSON array or single object). `-` reads stdin.
    #[arg(short, long, default_value = "-")]
    input: String,
    /// Where to write the output items. `-` writes to stdout.
    #[arg(short, long, default_value = "-")]
    output: String,
    /// Extra TOML configuration file, applied over user and project config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Record failed items as `{ "error": ... }` and keep going.
    #[arg(long)]
    continue_on_fail: bool,
    /// Archive password.
    #[arg(long, env = "SEVENRS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Custom 7z executable, tried before any other candidate.
    #[arg(long = "7z-path", env = "SEVENRS_7Z_PATH")]
    custom_7z_path: Option<String>,
    /// Per-attempt archiver timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Directory in which temporary workspaces are created.
    #[arg(long)]
    workspace_root: Option<String>,
}

impl CommonArgs {
    fn layer(&self, operation: Operation) -> ConfigLayer {
        ConfigLayer {
            operation: Some(operation),
            password: self.password.clone(),
            custom_7z_path: self.custom_7z_path.clone(),
            timeout_ms: self.timeout_ms,
            workspace_root: self.workspace_root.clone(),
            ..Default::default()
        }
    }
}

/// Arguments for `sevenrs extract`.
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Binary property holding the archive.
    #[arg(long)]
    input_property: Option<String>,
    /// JSON key listing the extracted files.
    #[arg(long)]
    output_property: Option<String>,
    /// One output item for all files, or one per file.
    #[arg(long, value_enum)]
    output_mode: Option<OutputMode>,
    /// Binary key for a lone extracted file or for each separate item.
    #[arg(long)]
    output_binary_property: Option<String>,
}

/// Arguments for `sevenrs compress`.
#[derive(Parser, Debug)]
pub struct CompressArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// File to add, as `NAME` or `NAME=PROPERTY` (property defaults to `data`). Repeatable.
    #[arg(long = "file", value_name = "NAME[=PROPERTY]", value_parser = CompressionEntry::parse)]
    files: Vec<CompressionEntry>,
    /// Name of the archive to create.
    #[arg(long)]
    archive_name: Option<String>,
}

/// Handler for `sevenrs extract`.
pub async fn handle_extract(args: ExtractArgs) -> Result<()> {
    let overrides = ConfigLayer {
        input_data_property_name: args.input_property,
        output_property_name: args.output_property,
        output_mode: args.output_mode,
        output_binary_property: args.output_binary_property,
        ..args.common.layer(Operation::Extract)
    };
    run_command(&args.common, overrides).await
}

/// Handler for `sevenrs compress`.
pub async fn handle_compress(args: CompressArgs) -> Result<()> {
    let overrides = ConfigLayer {
        files_to_compress: (!args.files.is_empty()).then_some(args.files),
        archive_name: args.archive_name,
        ..args.common.layer(Operation::Compress)
    };
    run_command(&args.common, overrides).await
}

async fn run_command(common: &CommonArgs, overrides: ConfigLayer) -> Result<()> {
    let config = config::load_config(common.config.as_deref(), overrides)?;
    let input = read_input(&common.input).await?;
    let items = parse_items(&input).context("Failed to parse pipeline items")?;
    info!("Processing {} item(s) with {:?}", items.len(), config.operation);

    let output = process_items(&items, &config, common.continue_on_fail).await?;
    let rendered = serde_json::to_string_pretty(&output)?;
    write_output(&common.output, &rendered).await
}

/// One archive operation for one pipeline item.
#[derive(Debug)]
pub struct ArchiveOperation<'a> {
    pub item_index: usize,
    pub item: &'a PipelineItem,
    pub config: &'a ArchiveConfig,
    /// Archiver executables to try, in order.
    pub candidates: Vec<String>,
}

impl<'a> ArchiveOperation<'a> {
    pub fn new(item_index: usize, item: &'a PipelineItem, config: &'a ArchiveConfig) -> Self {
        let candidates = build_candidates(config.custom_7z_path.as_deref());
        debug!("Item {}: archiver candidates {:?}", item_index, candidates);
        Self {
            item_index,
            item,
            config,
            candidates,
        }
    }

    #[cfg(test)]
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Runs the configured operation, returning its output records.
    pub async fn run(&self) -> Result<Vec<PipelineItem>> {
        match self.config.operation {
            Operation::Extract => extract::extract_item(self).await,
            Operation::Compress => compress::compress_item(self).await.map(|r| vec![r]),
        }
    }
}

/// Applies the configured operation to each item in order.
pub async fn process_items(
    items: &[PipelineItem],
    config: &ArchiveConfig,
    continue_on_fail: bool,
) -> Result<Vec<PipelineItem>> {
    let mut output = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match ArchiveOperation::new(index, item, config).run().await {
            Ok(records) => output.extend(records),
            Err(e) => {
                let message = format!("{:#}", e);
                if continue_on_fail {
                    error!("Item {} failed, continuing: {}", index, message);
                    output.push(PipelineItem::error_record(&message));
                } else {
                    return Err(ArchiveError::BatchItem { index, message }.into());
                }
            }
        }
    }
    Ok(output)
}

async fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read pipeline items from stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read pipeline items from {}", source))
    }
}

async fn write_output(target: &str, rendered: &str) -> Result<()> {
    if target == "-" {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    } else {
        tokio::fs::write(target, rendered)
            .await
            .with_context(|| format!("Failed to write output items to {}", target))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::error::Result;
    use crate::core::item::{BinaryPayload, PipelineItem};
    use std::path::Path;

    pub fn item_with_binary(property: &str, bytes: &[u8]) -> PipelineItem {
        let mut item = PipelineItem::default();
        item.binary.insert(
            property.to_string(),
            BinaryPayload::from_bytes(bytes, "input.bin", "application/octet-stream"),
        );
        item
    }

    /// Writes an executable `sh` script standing in for 7z.
    ///
    /// The path is listed twice: a concurrent fork elsewhere in the test binary
    /// can hold the fresh file open for a moment and make the first exec fail
    /// with ETXTBSY.
    #[cfg(unix)]
    pub fn fake_archiver(dir: &Path, name: &str, body: &str) -> Result<Vec<String>> {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body))?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        let path = path.to_string_lossy().into_owned();
        Ok(vec![path.clone(), path])
    }
}
