//! Configuration System
//!
//! Layered configuration for the manifest generator: built-in defaults, a
//! global file, workspace files and environment variables, merged with the
//! `config` crate. CLI flags are applied on top by the binary.

use crate::error::ManifestError;
use crate::logging::LoggingConfig;
use crate::manifest::document::DocumentOptions;
use crate::manifest::ident::IdStrategy;
use crate::tree::path::ensure_relative;
use crate::tree::walker::{SymlinkPolicy, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// One symbolic root: a `DirectoryRef` id and the build subdirectory placed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootMapping {
    pub id: String,
    pub path: PathBuf,
}

impl RootMapping {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WixfilesConfig {
    /// Build output directory the roots are relative to
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Generated include file
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Identity registry file
    #[serde(default = "default_registry")]
    pub registry: PathBuf,

    /// Prefix of `Source` attributes, as seen from the installer project
    #[serde(default = "default_build_dir")]
    pub source_prefix: PathBuf,

    #[serde(default = "default_true")]
    pub sort_entries: bool,

    /// File names left out of the walk at every depth
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub symlinks: SymlinkPolicy,

    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Ordered root mapping
    #[serde(default = "default_roots")]
    pub roots: Vec<RootMapping>,

    #[serde(default)]
    pub document: DocumentOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("../../build")
}

fn default_output() -> PathBuf {
    PathBuf::from("files.wxi")
}

fn default_registry() -> PathBuf {
    PathBuf::from("guids.lst")
}

fn default_true() -> bool {
    true
}

fn default_exclude() -> Vec<String> {
    vec!["BitcoenWallet.exe".to_string()]
}

fn default_roots() -> Vec<RootMapping> {
    vec![
        RootMapping::new("ELECTRONDIR", "BitcoenWallet-win32-x64"),
        RootMapping::new("COREDIR", "core"),
    ]
}

impl Default for WixfilesConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            output: default_output(),
            registry: default_registry(),
            source_prefix: default_build_dir(),
            sort_entries: default_true(),
            exclude: default_exclude(),
            symlinks: SymlinkPolicy::default(),
            id_strategy: IdStrategy::default(),
            roots: default_roots(),
            document: DocumentOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Root(String, String),
    Document(String),
    System(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Root(id, msg) => write!(f, "Root '{}': {}", id, msg),
            ValidationError::Document(msg) => write!(f, "Document: {}", msg),
            ValidationError::System(msg) => write!(f, "System: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

fn is_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

impl WixfilesConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.roots.is_empty() {
            errors.push(ValidationError::System(
                "At least one root mapping is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for root in &self.roots {
            if !is_identifier(&root.id) {
                errors.push(ValidationError::Root(
                    root.id.clone(),
                    "id must be non-empty and use only letters, digits, '_' and '.'".to_string(),
                ));
            }
            if !seen.insert(root.id.as_str()) {
                errors.push(ValidationError::Root(
                    root.id.clone(),
                    "duplicate root id".to_string(),
                ));
            }
            if let Err(e) = ensure_relative(&root.path) {
                errors.push(ValidationError::Root(root.id.clone(), e.to_string()));
            }
        }

        if self.document.feature_level == 0 {
            errors.push(ValidationError::Document(
                "feature_level must be at least 1".to_string(),
            ));
        }
        for (key, value) in [
            ("feature_id", &self.document.feature_id),
            ("executable_component", &self.document.executable_component),
            ("shortcut_component", &self.document.shortcut_component),
        ] {
            if !is_identifier(value) {
                errors.push(ValidationError::Document(format!(
                    "{} is not a valid identifier: '{}'",
                    key, value
                )));
            }
        }

        if self.output.as_os_str().is_empty() {
            errors.push(ValidationError::System("Output path cannot be empty".to_string()));
        }
        if self.registry.as_os_str().is_empty() {
            errors.push(ValidationError::System(
                "Registry path cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into one error.
    pub fn validated(self) -> Result<Self, ManifestError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ManifestError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Walker settings derived from this configuration
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            exclude: self.exclude.clone(),
            sort_entries: self.sort_entries,
            symlinks: self.symlinks,
            id_strategy: self.id_strategy,
            source_prefix: self.source_prefix.clone(),
        }
    }
}
