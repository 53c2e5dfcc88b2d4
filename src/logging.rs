//! Logging System
//!
//! Structured logging using the `tracing` crate. Stdout carries the run
//! summary, so diagnostics default to stderr.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (output = "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format on a terminal stream only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

/// Log file used when output is "file" and no path is configured
pub fn default_log_file() -> PathBuf {
    PathBuf::from("wixfiles.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (WIXFILES_LOG, WIXFILES_LOG_FORMAT, WIXFILES_LOG_OUTPUT)
/// 2. The given configuration (file layers plus CLI flags)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ManifestError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let use_color = config.color && format == "text" && !matches!(output, Output::File(_));
    let writer = match &output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::File(path) => BoxMakeWriter::new(open_log_file(path)?),
    };

    let base_subscriber = Registry::default().with(filter);
    let installed = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| ManifestError::Config(format!("Failed to install log subscriber: {}", e)))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, ManifestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ManifestError::Config(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ManifestError::Config(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Build environment filter from WIXFILES_LOG or config
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ManifestError> {
    if let Ok(filter) = EnvFilter::try_from_env("WIXFILES_LOG") {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level)
        .map_err(|e| ManifestError::Config(format!("Invalid log level '{}': {}", config.level, e)))
}

/// Determine output format from environment or config
fn determine_format(config: &LoggingConfig) -> Result<String, ManifestError> {
    if let Ok(format) = std::env::var("WIXFILES_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    parse_format(&config.format)
}

fn parse_format(format: &str) -> Result<String, ManifestError> {
    match format {
        "json" | "text" => Ok(format.to_string()),
        _ => Err(ManifestError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

/// Determine output destination from environment or config
fn determine_output(config: &LoggingConfig) -> Result<Output, ManifestError> {
    let output = std::env::var("WIXFILES_LOG_OUTPUT").unwrap_or_else(|_| config.output.clone());
    parse_output(&output, config.file.as_deref())
}

fn parse_output(output: &str, file: Option<&Path>) -> Result<Output, ManifestError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File(
            file.map(Path::to_path_buf).unwrap_or_else(default_log_file),
        )),
        _ => Err(ManifestError::Config(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            output
        ))),
    }
}
