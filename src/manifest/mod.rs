//! Manifest Model
//!
//! In-memory form of the generated WiX include: one [`RootEntry`] per
//! declared root mapping, each holding the directory tree found under it.

pub mod document;
pub mod ident;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A filesystem directory mapped into the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: String,
    /// Raw directory name; escaped at serialization time
    pub name: String,
    /// Path relative to the build directory
    pub relative_path: PathBuf,
    pub children: Vec<ManifestNode>,
}

/// A regular file installed by its own component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComponent {
    pub id: String,
    /// Raw file name; escaped at serialization time
    pub name: String,
    /// Path relative to the build directory
    pub relative_path: PathBuf,
    /// Path written to the `Source` attribute
    pub source: PathBuf,
    /// Durable token from the identity registry
    pub stable_id: String,
}

/// A node in the manifest tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestNode {
    Directory(DirectoryEntry),
    File(FileComponent),
}

impl ManifestNode {
    pub fn id(&self) -> &str {
        match self {
            ManifestNode::Directory(dir) => &dir.id,
            ManifestNode::File(file) => &file.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ManifestNode::Directory(dir) => &dir.name,
            ManifestNode::File(file) => &file.name,
        }
    }
}

/// The walked tree of one root mapping entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEntry {
    /// Symbolic directory id declared in the installer project
    pub id: String,
    /// Path relative to the build directory
    pub path: PathBuf,
    pub children: Vec<ManifestNode>,
}

/// Complete manifest for all roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub roots: Vec<RootEntry>,
}

impl Manifest {
    /// Ids of every file component, in depth-first walk order.
    pub fn component_ids(&self) -> Vec<&str> {
        self.files().map(|f| f.id.as_str()).collect()
    }

    /// Every file component, in depth-first walk order.
    pub fn files(&self) -> impl Iterator<Item = &FileComponent> + '_ {
        let mut stack: Vec<&ManifestNode> = self
            .roots
            .iter()
            .rev()
            .flat_map(|root| root.children.iter().rev())
            .collect();

        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                match node {
                    ManifestNode::File(file) => return Some(file),
                    ManifestNode::Directory(dir) => stack.extend(dir.children.iter().rev()),
                }
            }
            None
        })
    }

    /// Number of directory entries across all roots.
    pub fn directory_count(&self) -> usize {
        fn count(nodes: &[ManifestNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    ManifestNode::Directory(dir) => 1 + count(&dir.children),
                    ManifestNode::File(_) => 0,
                })
                .sum()
        }
        self.roots.iter().map(|root| count(&root.children)).sum()
    }

    /// First identifier used twice in the manifest, with the relative paths
    /// of both owners (earlier one first).
    ///
    /// Distinct names can derive to the same id (`a b.txt` and `a_b.txt`),
    /// and truncation can merge long ids that share a tail.
    pub fn duplicate_identifier(&self) -> Option<(&str, &Path, &Path)> {
        fn visit<'a>(
            nodes: &'a [ManifestNode],
            seen: &mut HashMap<&'a str, &'a Path>,
        ) -> Option<(&'a str, &'a Path, &'a Path)> {
            for node in nodes {
                let (id, path) = match node {
                    ManifestNode::Directory(dir) => (dir.id.as_str(), dir.relative_path.as_path()),
                    ManifestNode::File(file) => (file.id.as_str(), file.relative_path.as_path()),
                };
                if let Some(first) = seen.insert(id, path) {
                    return Some((id, first, path));
                }
                if let ManifestNode::Directory(dir) = node {
                    if let Some(found) = visit(&dir.children, seen) {
                        return Some(found);
                    }
                }
            }
            None
        }

        let mut seen = HashMap::new();
        for root in &self.roots {
            if let Some(first) = seen.insert(root.id.as_str(), root.path.as_path()) {
                return Some((root.id.as_str(), first, root.path.as_path()));
            }
        }
        self.roots
            .iter()
            .find_map(|root| visit(&root.children, &mut seen))
    }
}
