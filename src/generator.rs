//! Manifest Generator
//!
//! Walks every declared root in order, assigns stable ids through the
//! identity registry and serializes the result. The output file is written
//! only after the whole walk succeeded, and replaced atomically.

use crate::config::{RootMapping, WixfilesConfig};
use crate::error::ManifestError;
use crate::manifest::document::{self, DocumentOptions};
use crate::manifest::{Manifest, RootEntry};
use crate::registry::{
    FileRegistryBackend, IdentityRegistry, MemoryRegistryBackend, RegistryBackend,
};
use crate::tree::path::display_root;
use crate::tree::walker::{Walker, WalkerConfig};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{error, info, instrument};

/// Turns a root mapping and a build tree into a manifest document
pub struct ManifestGenerator<B: RegistryBackend> {
    walker: Walker,
    roots: Vec<RootMapping>,
    document: DocumentOptions,
    registry: IdentityRegistry<B>,
}

impl ManifestGenerator<FileRegistryBackend> {
    /// Generator backed by the registry file named in `config`.
    pub fn from_config(config: &WixfilesConfig) -> Result<Self, ManifestError> {
        let registry = IdentityRegistry::open(FileRegistryBackend::new(&config.registry))?;
        Ok(Self::new(config, registry))
    }
}

impl ManifestGenerator<MemoryRegistryBackend> {
    /// Generator that reads the registry file but keeps new tokens in memory.
    pub fn dry_run(config: &WixfilesConfig) -> Result<Self, ManifestError> {
        let records = FileRegistryBackend::new(&config.registry).load()?;
        let backend = MemoryRegistryBackend::from_lines(records.iter().map(|r| r.to_line()));
        let registry = IdentityRegistry::open(backend)?;
        Ok(Self::new(config, registry))
    }
}

impl<B: RegistryBackend> ManifestGenerator<B> {
    pub fn new(config: &WixfilesConfig, registry: IdentityRegistry<B>) -> Self {
        Self::with_parts(
            config.build_dir.clone(),
            config.walker_config(),
            config.roots.clone(),
            config.document.clone(),
            registry,
        )
    }

    pub fn with_parts(
        build_dir: PathBuf,
        walker_config: WalkerConfig,
        roots: Vec<RootMapping>,
        document: DocumentOptions,
        registry: IdentityRegistry<B>,
    ) -> Self {
        Self {
            walker: Walker::with_config(build_dir, walker_config),
            roots,
            document,
            registry,
        }
    }

    /// Walk every root, in declaration order.
    #[instrument(skip(self))]
    pub fn generate(&mut self) -> Result<Manifest, ManifestError> {
        let start = Instant::now();
        let build_dir = display_root(self.walker.build_dir());
        info!(build_dir = %build_dir.display(), roots = self.roots.len(), "Generating manifest");
        let mut manifest = Manifest::default();

        for root in &self.roots {
            let children = self.walker.walk(&mut self.registry, &root.id, &root.path)?;
            manifest.roots.push(RootEntry {
                id: root.id.clone(),
                path: root.path.clone(),
                children,
            });
        }

        if let Some((id, first, second)) = manifest.duplicate_identifier() {
            error!(id, first = %first.display(), second = %second.display(), "Duplicate identifier");
            return Err(ManifestError::DuplicateIdentifier {
                id: id.to_string(),
                first: first.to_path_buf(),
                second: second.to_path_buf(),
            });
        }

        info!(
            components = manifest.component_ids().len(),
            minted = self.registry.minted(),
            duration_ms = start.elapsed().as_millis(),
            "Manifest generated"
        );
        Ok(manifest)
    }

    /// Serialize a manifest with this generator's document options.
    pub fn render(&self, manifest: &Manifest) -> String {
        document::serialize(manifest, &self.document)
    }

    pub fn registry(&self) -> &IdentityRegistry<B> {
        &self.registry
    }
}

/// Counts reported after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub roots: usize,
    pub directories: usize,
    pub components: usize,
    pub minted: usize,
    /// Written file; `None` for dry runs
    pub output: Option<PathBuf>,
}

impl RunSummary {
    fn new<B: RegistryBackend>(
        manifest: &Manifest,
        registry: &IdentityRegistry<B>,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            roots: manifest.roots.len(),
            directories: manifest.directory_count(),
            components: manifest.component_ids().len(),
            minted: registry.minted(),
            output,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} components in {} directories under {} roots ({} new ids)",
            self.components, self.directories, self.roots, self.minted
        )?;
        if let Some(output) = &self.output {
            write!(f, " -> {}", output.display())?;
        }
        Ok(())
    }
}

/// Generate the manifest and write it to `config.output`.
pub fn run(config: &WixfilesConfig) -> Result<RunSummary, ManifestError> {
    let mut generator = ManifestGenerator::from_config(config)?;
    let manifest = generator.generate()?;
    write_document(&config.output, &generator.render(&manifest))?;
    info!(output = %config.output.display(), "Manifest written");
    let registry = generator.registry();
    if registry.minted() > 0 {
        info!(
            registry = %registry.backend().path().display(),
            minted = registry.minted(),
            "Identity registry extended"
        );
    }
    Ok(RunSummary::new(
        &manifest,
        generator.registry(),
        Some(config.output.clone()),
    ))
}

/// Generate the manifest without touching the registry or output files.
pub fn dry_run(config: &WixfilesConfig) -> Result<(String, RunSummary), ManifestError> {
    let mut generator = ManifestGenerator::dry_run(config)?;
    let manifest = generator.generate()?;
    let rendered = generator.render(&manifest);
    let summary = RunSummary::new(&manifest, generator.registry(), None);
    Ok((rendered, summary))
}

/// Replace `path` with `contents`: written to a sibling temp file, then renamed.
pub fn write_document(path: &Path, contents: &str) -> Result<(), ManifestError> {
    let output_err = |source| ManifestError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(output_err)?;
    temp.write_all(contents.as_bytes()).map_err(output_err)?;
    temp.flush().map_err(output_err)?;
    temp.persist(path).map_err(|e| output_err(e.error))?;
    Ok(())
}
