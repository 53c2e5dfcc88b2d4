//! Build tree walker producing manifest nodes

use crate::error::ManifestError;
use crate::manifest::ident::{derive_identifier, qualify_identifier, IdStrategy};
use crate::manifest::{DirectoryEntry, FileComponent, ManifestNode};
use crate::registry::{IdentityRegistry, RegistryBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};
use walkdir::{DirEntry, WalkDir};

/// What to do with symbolic links found in the build tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkPolicy {
    /// Treat the link as whatever it points to; dangling links become files
    #[default]
    Follow,
    /// Leave links out of the manifest
    Skip,
    /// Abort the walk
    Error,
}

/// Walker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// File names skipped at every depth (the main executable is declared elsewhere)
    pub exclude: Vec<String>,
    /// Visit entries ordered by file name instead of filesystem order
    pub sort_entries: bool,
    pub symlinks: SymlinkPolicy,
    pub id_strategy: IdStrategy,
    /// Prefix joined with each relative path for the `Source` attribute
    pub source_prefix: PathBuf,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["BitcoenWallet.exe".to_string()],
            sort_entries: true,
            symlinks: SymlinkPolicy::Follow,
            id_strategy: IdStrategy::Hashed,
            source_prefix: PathBuf::from("../../build"),
        }
    }
}

/// Walks directories below a build directory
pub struct Walker {
    build_dir: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a walker with the default configuration
    pub fn new(build_dir: PathBuf) -> Self {
        Self {
            build_dir,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(build_dir: PathBuf, config: WalkerConfig) -> Self {
        Self { build_dir, config }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Walk `relative_path` (relative to the build directory), qualifying
    /// every identifier below `root_id`.
    ///
    /// Files get their stable id from `registry`, which may append to its
    /// backend for paths it has not seen before.
    #[instrument(skip(self, registry), fields(path = %relative_path.display()))]
    pub fn walk<B: RegistryBackend>(
        &self,
        registry: &mut IdentityRegistry<B>,
        root_id: &str,
        relative_path: &Path,
    ) -> Result<Vec<ManifestNode>, ManifestError> {
        let full = self.build_dir.join(relative_path);
        if !full.is_dir() {
            error!(path = %full.display(), "Source directory missing");
            return Err(ManifestError::MissingSource { path: full });
        }

        let mut ancestors = vec![dunce::canonicalize(&full).unwrap_or(full)];
        self.walk_dir(registry, root_id, relative_path, &mut ancestors)
    }

    fn walk_dir<B: RegistryBackend>(
        &self,
        registry: &mut IdentityRegistry<B>,
        parent_id: &str,
        relative: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<Vec<ManifestNode>, ManifestError> {
        let dir = self.build_dir.join(relative);
        info!(path = %relative.display(), "Adding directory");

        let mut entries = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);
        if self.config.sort_entries {
            entries = entries.sort_by_file_name();
        }

        let mut nodes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ManifestError::Walk {
                path: dir.clone(),
                message: e.to_string(),
            })?;

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.config.exclude.iter().any(|excluded| *excluded == name) {
                debug!(name = %name, "Skipping excluded entry");
                continue;
            }

            let is_dir = match self.classify(&entry)? {
                Some(is_dir) => is_dir,
                None => continue,
            };

            let child_relative = relative.join(entry.file_name());
            let id = qualify_identifier(parent_id, &derive_identifier(&name), self.config.id_strategy);

            if is_dir {
                let canonical = dunce::canonicalize(entry.path()).map_err(|e| ManifestError::Walk {
                    path: entry.path().to_path_buf(),
                    message: e.to_string(),
                })?;
                if ancestors.contains(&canonical) {
                    return Err(ManifestError::Walk {
                        path: entry.path().to_path_buf(),
                        message: "symbolic link cycle".to_string(),
                    });
                }

                ancestors.push(canonical);
                let children = self.walk_dir(registry, &id, &child_relative, ancestors)?;
                ancestors.pop();

                nodes.push(ManifestNode::Directory(DirectoryEntry {
                    id,
                    name,
                    relative_path: child_relative,
                    children,
                }));
            } else {
                let stable_id = registry.resolve_stable_id(&child_relative)?;
                nodes.push(ManifestNode::File(FileComponent {
                    id,
                    name,
                    source: self.config.source_prefix.join(&child_relative),
                    relative_path: child_relative,
                    stable_id,
                }));
            }
        }

        Ok(nodes)
    }

    /// `Some(true)` for directories, `Some(false)` for anything installed as a
    /// file, `None` for entries left out.
    fn classify(&self, entry: &DirEntry) -> Result<Option<bool>, ManifestError> {
        let file_type = entry.file_type();
        if !file_type.is_symlink() {
            return Ok(Some(file_type.is_dir()));
        }

        match self.config.symlinks {
            SymlinkPolicy::Follow => Ok(Some(entry.path().is_dir())),
            SymlinkPolicy::Skip => {
                debug!(path = %entry.path().display(), "Skipping symbolic link");
                Ok(None)
            }
            SymlinkPolicy::Error => Err(ManifestError::SymlinkRejected {
                path: entry.path().to_path_buf(),
            }),
        }
    }
}
