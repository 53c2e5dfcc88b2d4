//! Merge rules: defaults, override order, conflict handling.
//!
//! Scalar keys get their defaults here so every later source overrides them
//! key by key. Tables and arrays (`roots`, `exclude`, `document`, `logging`)
//! fall back to serde defaults instead: a source that sets `roots` replaces
//! the whole list rather than merging element by element.

use crate::config::WixfilesConfig;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    let defaults = WixfilesConfig::default();
    Config::builder()
        .set_default("build_dir", defaults.build_dir.to_string_lossy().into_owned())?
        .set_default("output", defaults.output.to_string_lossy().into_owned())?
        .set_default("registry", defaults.registry.to_string_lossy().into_owned())?
        .set_default("source_prefix", defaults.source_prefix.to_string_lossy().into_owned())?
        .set_default("sort_entries", defaults.sort_entries)?
        .set_default("symlinks", "follow")?
        .set_default("id_strategy", "hashed")
}
