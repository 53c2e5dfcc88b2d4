//! Wixfiles CLI Binary
//!
//! Writes the WiX file manifest for the configured build tree.

use clap::Parser;
use std::process;
use tracing::{error, info};
use wixfiles::cli::{map_error, Cli, RunContext};
use wixfiles::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let config = match RunContext::resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    // Initialize logging early
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Wixfiles starting");

    let context = match RunContext::new(config, cli.dry_run) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute() {
        Ok(output) => {
            info!("Generation completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}
