//! Error types for manifest generation.

use std::path::PathBuf;
use thiserror::Error;

/// Identity registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read identity registry {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to append to identity registry {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed identity registry line {line} in {path:?}: expected \"<token> <path>\"")]
    Malformed { path: PathBuf, line: usize },

    #[error("Cannot record {path:?} in the identity registry: the name contains a line break")]
    UnrepresentablePath { path: String },
}

/// Errors that abort a generator run
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Source directory missing or not a directory: {path:?}. Did the build produce it?")]
    MissingSource { path: PathBuf },

    #[error("Failed to walk {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Symbolic link rejected by configuration: {path:?}")]
    SymlinkRejected { path: PathBuf },

    #[error("Identifier {id} is used by both {first:?} and {second:?}; rename one of them")]
    DuplicateIdentifier {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to write manifest {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ManifestError {
    fn from(err: config::ConfigError) -> Self {
        ManifestError::Config(err.to_string())
    }
}
