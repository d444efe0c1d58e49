//! # SevenRS Extract Operation
//!
//! File: cli/src/commands/extract.rs
//!
//! ## Overview
//!
//! Implements `sevenrs extract`: unpacks the archive carried in an item's
//! binary property and returns the files as output items.
//!
//! ## Architecture
//!
//! 1. Decode the archive bytes from `input_data_property_name`
//! 2. Acquire a `7z-extract-` workspace and write the archive into it
//! 3. Run `7z x` across the resolved candidates
//! 4. Harvest the `extracted/` tree
//! 5. Map the files to one record (single mode) or one per file (separate mode)
//! 6. Release the workspace, whatever happened
//!
use crate::commands::{mapper, ArchiveOperation};
use crate::common::archive::sevenzip;
use crate::common::fs::{harvest::harvest_files, io::write_bytes_to_file, workspace::Workspace};
use crate::core::config::OutputMode;
use crate::core::error::{ArchiveError, Result};
use crate::core::item::PipelineItem;
use anyhow::Context;
use tracing::info;

const WORKSPACE_PREFIX: &str = "7z-extract-";
const ARCHIVE_FILE_NAME: &str = "archive.7z";
const OUTPUT_DIR_NAME: &str = "extracted";

/// Extracts the archive of one item.
pub async fn extract_item(op: &ArchiveOperation<'_>) -> Result<Vec<PipelineItem>> {
    let property = op.config.input_data_property_name.as_str();
    if !op.item.has_binary(property) {
        anyhow::bail!(ArchiveError::MissingBinary {
            property: property.to_string(),
        });
    }
    let archive = op.item.binary_bytes(property)?;

    let workspace = Workspace::acquire(
        op.config.workspace_root.as_deref(),
        WORKSPACE_PREFIX,
        ARCHIVE_FILE_NAME,
        OUTPUT_DIR_NAME,
    )
    .await?;
    let outcome = extract_in(op, &workspace, &archive).await;
    workspace.release();
    outcome.context("Failed to extract 7z archive")
}

async fn extract_in(
    op: &ArchiveOperation<'_>,
    workspace: &Workspace,
    archive: &[u8],
) -> Result<Vec<PipelineItem>> {
    let config = op.config;
    write_bytes_to_file(workspace.archive_path(), archive).await?;

    let run = sevenzip::extract_full(
        &op.candidates,
        workspace.archive_path(),
        workspace.work_dir(),
        config.password.as_deref(),
        config.timeout,
    )
    .await?;

    let files = harvest_files(workspace.work_dir()).await?;
    info!(
        "Item {}: extracted {} file(s) from {} byte archive with {} ({} attempt(s))",
        op.item_index,
        files.len(),
        archive.len(),
        run.program,
        run.attempts
    );

    Ok(match config.output_mode {
        OutputMode::Single => vec![mapper::single_record(&files, config)],
        OutputMode::Separate => mapper::separate_records(&files, config),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::test_support::{fake_archiver, item_with_binary};
    use crate::core::config::ArchiveConfig;
    use serde_json::json;
    use tempfile::tempdir;

    const TWO_FILES: &str = r#"
for a in "$@"; do case "$a" in -o*) out="${a#-o}";; esac; done
mkdir -p "$out/b" && printf 'alpha' > "$out/a.txt" && printf 'gamma' > "$out/b/c.txt"
"#;

    const ONE_FILE: &str = r#"
for a in "$@"; do case "$a" in -o*) out="${a#-o}";; esac; done
printf 'quarterly numbers' > "$out/report.txt"
"#;

    fn config(root: &std::path::Path) -> ArchiveConfig {
        ArchiveConfig {
            workspace_root: Some(root.to_path_buf()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_extract_single_mode_two_files() -> Result<()> {
        let tools = tempdir()?;
        let scratch = tempdir()?;
        let archiver = fake_archiver(tools.path(), "two", TWO_FILES)?;
        let config = config(scratch.path());
        let item = item_with_binary("data", b"not really 7z");

        let op = ArchiveOperation::new(0, &item, &config).with_candidates(archiver);
        let records = extract_item(&op).await?;

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.json["extractedCount"], json!(2));
        let mut keys: Vec<_> = record.binary.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a.txt", "b/c.txt"]);
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_extract_single_file_keyed_by_output_property() -> Result<()> {
        let tools = tempdir()?;
        let scratch = tempdir()?;
        let archiver = fake_archiver(tools.path(), "one", ONE_FILE)?;
        let config = ArchiveConfig {
            output_binary_property: "file".to_string(),
            ..config(scratch.path())
        };
        let item = item_with_binary("data", b"x");

        let op = ArchiveOperation::new(0, &item, &config).with_candidates(archiver);
        let records = extract_item(&op).await?;

        assert_eq!(records[0].binary.keys().collect::<Vec<_>>(), vec!["file"]);
        assert_eq!(records[0].json["files"]["file"]["fileName"], json!("report.txt"));
        Ok(())
    }

    #[tokio::test]
    async fn test_extract_separate_mode() -> Result<()> {
        let tools = tempdir()?;
        let scratch = tempdir()?;
        let archiver = fake_archiver(tools.path(), "two", TWO_FILES)?;
        let config = ArchiveConfig {
            output_mode: OutputMode::Separate,
            ..config(scratch.path())
        };
        let item = item_with_binary("data", b"x");

        let op = ArchiveOperation::new(0, &item, &config).with_candidates(archiver);
        let records = extract_item(&op).await?;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.binary.contains_key("data")));
        Ok(())
    }

    #[tokio::test]
    async fn test_extract_missing_binary_property() {
        let config = ArchiveConfig::default();
        let item = item_with_binary("other", b"x");
        let op = ArchiveOperation::new(0, &item, &config);
        let err = extract_item(&op).await.unwrap_err();
        assert_eq!(err.to_string(), "No binary data found in property \"data\"");
    }

    #[tokio::test]
    async fn test_extract_all_candidates_fail_cleans_workspace() -> Result<()> {
        let scratch = tempdir()?;
        let config = config(scratch.path());
        let item = item_with_binary("data", b"x");
        let op = ArchiveOperation::new(0, &item, &config).with_candidates(vec![
            "/nonexistent/sevenrs-7z".to_string(),
            "false".to_string(),
        ]);

        let err = extract_item(&op).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Failed to extract 7z archive: 'false' exited"), "{}", message);
        assert!(matches!(
            err.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::ArchiverInvocation { .. })
        ));
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }
}
