//! Shared test utilities for integration tests
//!
//! Builds throwaway build trees and configurations rooted in a temp dir, so
//! every path handed to the generator is absolute and tests do not depend on
//! the process working directory.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wixfiles::config::{RootMapping, WixfilesConfig};

/// Create files (and their parent directories) below `root`.
/// Entries ending in `/` are created as empty directories.
pub fn build_tree(root: &Path, entries: &[&str]) {
    for entry in entries {
        if let Some(dir) = entry.strip_suffix('/') {
            fs::create_dir_all(root.join(dir)).unwrap();
        } else {
            let path = root.join(entry);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("contents of {}", entry)).unwrap();
        }
    }
}

/// Configuration with a single root `COREDIR -> core`, everything inside `temp_dir`.
pub fn core_config(temp_dir: &TempDir) -> WixfilesConfig {
    let mut config = WixfilesConfig::default();
    config.build_dir = build_dir(temp_dir);
    config.output = temp_dir.path().join("files.wxi");
    config.registry = temp_dir.path().join("guids.lst");
    config.roots = vec![RootMapping::new("COREDIR", "core")];
    config.logging.enabled = false;
    config
}

pub fn build_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("build")
}

/// Registry file lines, empty when the file does not exist.
pub fn registry_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// `(Id, Guid)` of every `Component` element, in document order.
pub fn components(document: &str) -> Vec<(String, String)> {
    let doc = roxmltree::Document::parse(document).expect("document must be well-formed");
    doc.descendants()
        .filter(|n| n.has_tag_name("Component"))
        .map(|n| {
            (
                n.attribute("Id").unwrap().to_string(),
                n.attribute("Guid").unwrap().to_string(),
            )
        })
        .collect()
}

/// Ids referenced from the `Feature` block, in document order.
pub fn component_refs(document: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(document).expect("document must be well-formed");
    doc.descendants()
        .filter(|n| n.has_tag_name("ComponentRef"))
        .map(|n| n.attribute("Id").unwrap().to_string())
        .collect()
}
