//! # SevenRS Result Mapper
//!
//! File: cli/src/commands/mapper.rs
//!
//! ## Overview
//!
//! Shapes harvested files and produced archives into output pipeline items.
//!
//! - **Single mode**: one record for all extracted files. Binary keys are the
//!   relative paths, except that a lone file is stored under the configured
//!   output binary property.
//! - **Separate mode**: one record per extracted file.
//! - **Compression**: one record holding the archive.
//!
use crate::common::archive::mime::{mime_type_for, SEVEN_Z_MIME};
use crate::common::fs::harvest::ExtractedFile;
use crate::core::config::ArchiveConfig;
use crate::core::item::{BinaryPayload, PipelineItem};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// All extracted files in one record.
pub fn single_record(files: &[ExtractedFile], config: &ArchiveConfig) -> PipelineItem {
    let mut binary = BTreeMap::new();
    let mut described = Map::new();
    let mut keys = Vec::with_capacity(files.len());

    for file in files {
        let key = if files.len() == 1 {
            config.output_binary_property.clone()
        } else {
            file.relative_path.clone()
        };
        let mime_type = mime_type_for(&file.relative_path);
        binary.insert(
            key.clone(),
            BinaryPayload::from_bytes(&file.data, &file.relative_path, mime_type),
        );
        described.insert(key.clone(), describe(file, mime_type));
        keys.push(Value::String(key));
    }

    let mut meta = Map::new();
    meta.insert(config.output_property_name.clone(), Value::Array(keys));
    meta.insert("extractedCount".to_string(), json!(files.len()));
    meta.insert("files".to_string(), Value::Object(described));
    PipelineItem::new(meta, binary)
}

/// One record per extracted file.
pub fn separate_records(files: &[ExtractedFile], config: &ArchiveConfig) -> Vec<PipelineItem> {
    files
        .iter()
        .map(|file| {
            let mime_type = mime_type_for(&file.relative_path);
            let mut meta = match describe(file, mime_type) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            meta.insert(
                config.output_property_name.clone(),
                Value::String(file.relative_path.clone()),
            );
            let mut binary = BTreeMap::new();
            binary.insert(
                config.output_binary_property.clone(),
                BinaryPayload::from_bytes(&file.data, &file.relative_path, mime_type),
            );
            PipelineItem::new(meta, binary)
        })
        .collect()
}

/// The single record produced by a compress operation.
pub fn compression_record(archive_name: &str, archive: &[u8], file_count: usize) -> PipelineItem {
    let mut meta = Map::new();
    meta.insert("archiveName".to_string(), json!(archive_name));
    meta.insert("compressedSize".to_string(), json!(archive.len()));
    meta.insert("fileCount".to_string(), json!(file_count));
    let mut binary = BTreeMap::new();
    binary.insert(
        archive_name.to_string(),
        BinaryPayload::from_bytes(archive, archive_name, SEVEN_Z_MIME),
    );
    PipelineItem::new(meta, binary)
}

fn describe(file: &ExtractedFile, mime_type: &str) -> Value {
    json!({
        "fileName": file.relative_path,
        "fileSize": file.size,
        "mimeType": mime_type,
    })
}
