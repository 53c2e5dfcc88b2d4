//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ManifestError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ManifestError) -> String {
    match e {
        ManifestError::MissingSource { path } => format!(
            "error: build output not found at {}\nhint: run the build before generating the manifest",
            path.display()
        ),
        other => format!("error: {}", other),
    }
}
