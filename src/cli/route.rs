//! CLI route: resolves configuration and dispatches to the generator.

use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, WixfilesConfig};
use crate::error::ManifestError;
use crate::generator;
use crate::logging::LoggingConfig;
use tracing::info;

/// Runtime context for CLI execution: resolved configuration and run mode.
pub struct RunContext {
    config: WixfilesConfig,
    dry_run: bool,
}

impl RunContext {
    /// Load configuration the way the flags ask for and apply CLI overrides.
    ///
    /// Precedence: CLI flags override config file override defaults.
    pub fn resolve_config(cli: &Cli) -> Result<WixfilesConfig, ManifestError> {
        let mut config = if let Some(ref config_path) = cli.config {
            ConfigLoader::load_from_file(config_path)?
        } else {
            ConfigLoader::load(&cli.workspace)?
        };

        if let Some(ref build_dir) = cli.build_dir {
            config.build_dir = build_dir.clone();
        }
        if let Some(ref output) = cli.output {
            config.output = output.clone();
        }
        if let Some(ref registry) = cli.registry {
            config.registry = registry.clone();
        }
        if cli.no_sort {
            config.sort_entries = false;
        }
        apply_logging_overrides(cli, &mut config.logging);

        Ok(config)
    }

    /// Validate the configuration and build the context.
    pub fn new(config: WixfilesConfig, dry_run: bool) -> Result<Self, ManifestError> {
        Ok(Self {
            config: config.validated()?,
            dry_run,
        })
    }

    /// Run the generator; returns text for stdout.
    pub fn execute(&self) -> Result<String, ManifestError> {
        if self.dry_run {
            let (document, summary) = generator::dry_run(&self.config)?;
            info!(%summary, "Dry run completed");
            return Ok(document.trim_end().to_string());
        }

        let summary = generator::run(&self.config)?;
        Ok(summary.to_string())
    }
}

fn apply_logging_overrides(cli: &Cli, logging: &mut LoggingConfig) {
    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }
}
