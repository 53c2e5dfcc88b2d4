//! Config loader: assembles sources in precedence order and deserializes.

use crate::config::merge::merge_policy::builder_with_defaults;
use crate::config::sources::{environment, global_file};
use crate::config::WixfilesConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`WixfilesConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{WIXFILES_ENV}.toml`,
    /// `WIXFILES__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<WixfilesConfig, ConfigError> {
        let mut builder = builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        builder = add_workspace_files(builder, workspace_root);
        builder = environment::add_to_builder(builder);

        let config: WixfilesConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from one explicit file; replaces the file layers.
    pub fn load_from_file(path: &Path) -> Result<WixfilesConfig, ConfigError> {
        let mut builder = builder_with_defaults()?;
        builder = builder.add_source(File::from(path).required(true));
        builder = environment::add_to_builder(builder);

        let config: WixfilesConfig = builder.build()?.try_deserialize()?;
        debug!(config_path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Path of the global config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}

/// Name of the workspace profile file loaded after `config/config.toml`
fn profile_name() -> String {
    std::env::var("WIXFILES_ENV")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "development".to_string())
}

/// Existing files among `config/config.toml` and `config/{profile}.toml`,
/// later ones taking precedence.
fn add_workspace_files(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    let config_dir = workspace_root.join("config");
    let candidates = [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", profile_name())),
    ];

    candidates
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), "Workspace configuration file");
            builder.add_source(File::from(path).required(false))
        })
}
