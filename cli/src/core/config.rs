//! # SevenRS Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module builds the immutable `ArchiveConfig` that drives one run. Every
//! recognized option is enumerated here with its default, so operations never
//! look parameters up dynamically.
//!
//! ## Architecture
//!
//! Configuration is assembled from layers, each a partially filled
//! `ConfigLayer`. Later layers win field by field:
//! 1. Default values defined in the code
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Project-specific `.sevenrs.toml` in current directory or ancestors
//! 4. An explicit `--config <file>`
//! 5. Command-line flags
//!
//! Paths are expanded (`~` to home directory) and the merged result is
//! validated before use.
//!
//! ## Examples
//!
//! ```toml
//! operation = "compress"
//! archive_name = "bundle.7z"
//! password = "s3cret"
//! custom_7z_path = "~/bin/7zz"
//! timeout_ms = 60000
//!
//! [[files_to_compress]]
//! file_name = "docs/readme.txt"
//! data_property = "readme"
//! ```
//!
use crate::core::error::{ArchiveError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".sevenrs.toml";

/// Per-attempt archiver timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Which direction an operation runs.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Extract,
    Compress,
}

/// How extracted files are returned.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// All files in one output record.
    #[default]
    Single,
    /// One output record per file.
    Separate,
}

/// One file to place in a new archive.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompressionEntry {
    /// Path of the file inside the archive.
    #[serde(alias = "fileName")]
    pub file_name: String,
    /// Binary property or JSON field holding the content.
    #[serde(alias = "dataProperty", default = "default_data_property")]
    pub data_property: String,
}

impl CompressionEntry {
    /// Parses `NAME` or `NAME=PROPERTY` as given on the command line.
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let (file_name, data_property) = match spec.split_once('=') {
            Some((name, prop)) => (name.trim(), prop.trim()),
            None => (spec.trim(), ""),
        };
        if file_name.is_empty() {
            return Err(format!("missing file name in '{}'", spec));
        }
        Ok(Self {
            file_name: file_name.to_string(),
            data_property: if data_property.is_empty() {
                default_data_property()
            } else {
                data_property.to_string()
            },
        })
    }
}

/// One partially specified configuration source.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub operation: Option<Operation>,
    pub input_data_property_name: Option<String>,
    pub output_property_name: Option<String>,
    pub output_mode: Option<OutputMode>,
    pub output_binary_property: Option<String>,
    pub files_to_compress: Option<Vec<CompressionEntry>>,
    pub archive_name: Option<String>,
    pub password: Option<String>,
    pub custom_7z_path: Option<String>,
    pub timeout_ms: Option<u64>,
    pub workspace_root: Option<String>,
}

impl ConfigLayer {
    /// Overlays `higher` on top of `self`; any field set in `higher` wins.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            operation: higher.operation.or(self.operation),
            input_data_property_name: higher
                .input_data_property_name
                .or(self.input_data_property_name),
            output_property_name: higher.output_property_name.or(self.output_property_name),
            output_mode: higher.output_mode.or(self.output_mode),
            output_binary_property: higher
                .output_binary_property
                .or(self.output_binary_property),
            files_to_compress: higher.files_to_compress.or(self.files_to_compress),
            archive_name: higher.archive_name.or(self.archive_name),
            password: higher.password.or(self.password),
            custom_7z_path: higher.custom_7z_path.or(self.custom_7z_path),
            timeout_ms: higher.timeout_ms.or(self.timeout_ms),
            workspace_root: higher.workspace_root.or(self.workspace_root),
        }
    }
}

/// The resolved, immutable configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    pub operation: Operation,
    /// Binary property holding the archive to extract.
    pub input_data_property_name: String,
    /// JSON key under which extracted file names are listed.
    pub output_property_name: String,
    pub output_mode: OutputMode,
    /// Binary key for single-file or per-file extraction output.
    pub output_binary_property: String,
    pub files_to_compress: Vec<CompressionEntry>,
    pub archive_name: String,
    /// `None` when no password is configured (an empty string counts as none).
    pub password: Option<String>,
    /// Trimmed custom archiver path, `None` when blank.
    pub custom_7z_path: Option<String>,
    pub timeout: Duration,
    /// Parent directory for workspaces; system temp dir when `None`.
    pub workspace_root: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            operation: Operation::default(),
            input_data_property_name: default_data_property(),
            output_property_name: default_output_property(),
            output_mode: OutputMode::default(),
            output_binary_property: default_data_property(),
            files_to_compress: Vec::new(),
            archive_name: default_archive_name(),
            password: None,
            custom_7z_path: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            workspace_root: None,
        }
    }
}

fn default_data_property() -> String {
    "data".to_string()
}
fn default_output_property() -> String {
    "extractedFiles".to_string()
}
fn default_archive_name() -> String {
    "archive.7z".to_string()
}

/// Loads and merges all configuration layers, then applies `overrides` last.
pub fn load_config(explicit: Option<&Path>, overrides: ConfigLayer) -> Result<ArchiveConfig> {
    let mut layers = Vec::new();
    if let Some(user) = load_user_config()? {
        layers.push(user);
    }
    if let Some(project) = load_project_config()? {
        layers.push(project);
    }
    if let Some(path) = explicit {
        info!("Loading configuration from: {}", path.display());
        layers.push(load_config_from_path(path)?);
    }
    layers.push(overrides);
    let config = build_config(layers)?;
    debug!("Final loaded configuration: {:?}", redacted(&config));
    Ok(config)
}

/// Merges layers in order, expands paths and validates the result.
pub fn build_config(layers: Vec<ConfigLayer>) -> Result<ArchiveConfig> {
    let mut merged = layers
        .into_iter()
        .fold(ConfigLayer::default(), ConfigLayer::merge);
    expand_config_paths(&mut merged);
    let config = resolve(merged);
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn resolve(layer: ConfigLayer) -> ArchiveConfig {
    let defaults = ArchiveConfig::default();
    ArchiveConfig {
        operation: layer.operation.unwrap_or(defaults.operation),
        input_data_property_name: layer
            .input_data_property_name
            .unwrap_or(defaults.input_data_property_name),
        output_property_name: layer
            .output_property_name
            .unwrap_or(defaults.output_property_name),
        output_mode: layer.output_mode.unwrap_or(defaults.output_mode),
        output_binary_property: layer
            .output_binary_property
            .unwrap_or(defaults.output_binary_property),
        files_to_compress: layer.files_to_compress.unwrap_or_default(),
        archive_name: layer.archive_name.unwrap_or(defaults.archive_name),
        password: layer.password.filter(|p| !p.is_empty()),
        custom_7z_path: layer
            .custom_7z_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        timeout: layer
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout),
        workspace_root: layer.workspace_root.map(PathBuf::from),
    }
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "SevenRS", "sevenrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No project configuration file (.sevenrs.toml) found.");
            Ok(None)
        }
    }
}

/// Walks up from `start` looking for `.sevenrs.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(layer: &mut ConfigLayer) {
    if let Some(path) = layer.custom_7z_path.as_mut() {
        *path = shellexpand::tilde(path.trim()).into_owned();
        debug!("Expanded custom 7z path: {}", path);
    }
    if let Some(root) = layer.workspace_root.as_mut() {
        *root = shellexpand::tilde(root).into_owned();
        debug!("Expanded workspace root: {}", root);
    }
}

fn validate_config(config: &ArchiveConfig) -> Result<()> {
    if config.input_data_property_name.is_empty() {
        return Err(anyhow!(ArchiveError::Config(
            "input_data_property_name cannot be empty".to_string()
        )));
    }
    if config.output_property_name.is_empty() {
        return Err(anyhow!(ArchiveError::Config(
            "output_property_name cannot be empty".to_string()
        )));
    }
    if config.output_binary_property.is_empty() {
        return Err(anyhow!(ArchiveError::Config(
            "output_binary_property cannot be empty".to_string()
        )));
    }
    let name = config.archive_name.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(anyhow!(ArchiveError::Config(format!(
            "Invalid archive name '{}'. Expected a plain file name.",
            name
        ))));
    }
    if config.timeout.is_zero() {
        return Err(anyhow!(ArchiveError::Config(
            "timeout_ms must be greater than zero".to_string()
        )));
    }
    for entry in &config.files_to_compress {
        if entry.file_name.trim().is_empty() {
            return Err(anyhow!(ArchiveError::Config(format!(
                "Compression entry for property '{}' has an empty file name.",
                entry.data_property
            ))));
        }
    }
    if let Some(root) = &config.workspace_root {
        if root.exists() && !root.is_dir() {
            return Err(anyhow!(ArchiveError::Config(format!(
                "Configured workspace root '{}' exists but is not a directory.",
                root.display()
            ))));
        }
    }
    Ok(())
}

/// Copy of the config safe to log: the password is masked.
fn redacted(config: &ArchiveConfig) -> ArchiveConfig {
    let mut copy = config.clone();
    if copy.password.is_some() {
        copy.password = Some("***".to_string());
    }
    copy
}
