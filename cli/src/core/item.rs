//! # SevenRS Pipeline Items
//!
//! File: cli/src/core/item.rs
//!
//! ## Overview
//!
//! Pipeline items are the records exchanged with the enclosing pipeline. Each
//! item carries a JSON metadata object and zero or more named binary payloads.
//! The same shape is used for input items and for the output records produced
//! by extraction and compression.
//!
//! ```json
//! {
//!   "json":   { "notes": "hello" },
//!   "binary": { "data": { "data": "N3q8ryccAAR...", "fileName": "in.7z" } }
//! }
//! ```
//!
//! Payload bytes travel as standard base64 inside `data`.
//!
use crate::core::error::{ArchiveError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One record flowing through the pipeline.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PipelineItem {
    #[serde(default)]
    pub json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary: BTreeMap<String, BinaryPayload>,
}

/// A named binary attachment of a pipeline item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPayload {
    /// Base64-encoded content.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl BinaryPayload {
    /// Wraps raw bytes as a payload, recording name, MIME type and size.
    pub fn from_bytes(bytes: &[u8], file_name: &str, mime_type: &str) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            file_name: Some(file_name.to_string()),
            mime_type: Some(mime_type.to_string()),
            file_size: Some(bytes.len() as u64),
        }
    }
}

impl PipelineItem {
    /// Builds an item from a metadata object and its payloads.
    pub fn new(json: Map<String, Value>, binary: BTreeMap<String, BinaryPayload>) -> Self {
        Self { json, binary }
    }

    /// The record emitted in place of a failed item when the batch continues on failure.
    pub fn error_record(message: &str) -> Self {
        let mut json = Map::new();
        json.insert("error".to_string(), Value::String(message.to_string()));
        Self {
            json,
            binary: BTreeMap::new(),
        }
    }

    pub fn has_binary(&self, property: &str) -> bool {
        self.binary.contains_key(property)
    }

    /// Decodes the named binary payload.
    ///
    /// Errors name the property so the user can tell which attachment was bad.
    pub fn binary_bytes(&self, property: &str) -> Result<Vec<u8>> {
        let payload = self
            .binary
            .get(property)
            .ok_or_else(|| ArchiveError::MissingBinary {
                property: property.to_string(),
            })?;
        STANDARD.decode(payload.data.trim()).map_err(|e| {
            ArchiveError::PayloadDecode {
                property: property.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the JSON field as bytes to write into a file.
    ///
    /// Strings are taken as UTF-8 text. Other non-null values are written as
    /// their JSON text. Missing, null, empty strings and `false` count as absent.
    pub fn text_bytes(&self, field: &str) -> Option<Vec<u8>> {
        match self.json.get(field)? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.as_bytes().to_vec()),
            other => Some(other.to_string().into_bytes()),
        }
    }
}

/// Parses pipeline input: either a JSON array of items or a single item object.
pub fn parse_items(input: &str) -> Result<Vec<PipelineItem>> {
    let value: Value = serde_json::from_str(input)?;
    let items = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        Value::Object(_) => vec![serde_json::from_value(value)?],
        _ => anyhow::bail!(ArchiveError::Config(
            "Pipeline input must be a JSON array of items or a single item object".to_string()
        )),
    };
    Ok(items)
}
