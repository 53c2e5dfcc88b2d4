//! Path helpers shared by the walker and the identity registry

use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// Canonicalize the build directory for logging and error messages.
///
/// Falls back to the path as given when it cannot be resolved; the walk
/// reports the missing directory itself.
pub fn display_root(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Key under which a relative path is stored in the identity registry
///
/// The exact path text with the platform separator. No Unicode normalization:
/// composed and decomposed spellings of a name are different files on disk.
pub fn registry_key(relative_path: &Path) -> String {
    relative_path.to_string_lossy().into_owned()
}

/// Reject paths that would escape the build directory.
pub fn ensure_relative(path: &Path) -> Result<(), ManifestError> {
    use std::path::Component;

    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(ManifestError::Config(format!(
            "Root path must be relative to the build directory: {}",
            path.display()
        )));
    }
    Ok(())
}
