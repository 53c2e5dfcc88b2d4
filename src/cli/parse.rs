//! CLI parse: clap types for wixfiles. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Generate a WiX include listing every file of a build tree
///
/// Every flag is optional; without flags the configured (or built-in)
/// root mapping is walked and `files.wxi` is written to the current directory.
#[derive(Parser, Debug)]
#[command(name = "wixfiles")]
#[command(about = "Generate a WiX file manifest with stable component GUIDs")]
pub struct Cli {
    /// Directory whose config/ subdirectory holds workspace configuration
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces global and workspace config files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Build output directory the roots are relative to
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Generated include file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Identity registry file
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Keep filesystem enumeration order instead of sorting by name
    #[arg(long)]
    pub no_sort: bool,

    /// Print the document to stdout; leave registry and output untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Debug-level logging
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
