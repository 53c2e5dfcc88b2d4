//! End-to-end generation against real build trees

use super::test_utils::{
    build_dir, build_tree, component_refs, components, core_config, registry_lines,
};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use wixfiles::config::RootMapping;
use wixfiles::error::ManifestError;
use wixfiles::generator;
use wixfiles::manifest::ident::MAX_IDENTIFIER_LEN;

#[test]
fn test_generates_core_tree_with_fresh_tokens() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll", "core/data/b.txt"]);
    let config = core_config(&temp_dir);

    let summary = generator::run(&config).unwrap();
    assert_eq!(summary.components, 2);
    assert_eq!(summary.directories, 1);
    assert_eq!(summary.minted, 2);

    let document = fs::read_to_string(&config.output).unwrap();
    let doc = roxmltree::Document::parse(&document).unwrap();

    let directories: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name("Directory"))
        .map(|n| (n.attribute("Id").unwrap(), n.attribute("Name").unwrap()))
        .collect();
    assert_eq!(directories, vec![("COREDIR.data", "data")]);

    let found = components(&document);
    let ids: Vec<&str> = found.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["COREDIR.a.dll", "COREDIR.data.b.txt"]);

    // Each token is the one recorded in the registry for that path
    let lines = registry_lines(&config.registry);
    assert_eq!(lines.len(), 2);
    for (_, guid) in &found {
        assert!(lines.iter().any(|l| l.starts_with(&format!("{} ", guid))));
    }

    assert_eq!(
        component_refs(&document),
        vec![
            "BitcoenWallet.exe",
            "COREDIR.a.dll",
            "COREDIR.data.b.txt",
            "ProgramMenuDir"
        ]
    );
}

#[test]
fn test_source_attributes_point_into_build_tree() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/data/b.txt"]);
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let document = fs::read_to_string(&config.output).unwrap();
    assert!(document.contains("Source=\"..\\..\\build\\core\\data\\b.txt\""));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(
        &build_dir(&temp_dir),
        &["core/z.dll", "core/a.dll", "core/m/n.txt", "core/empty/"],
    );
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let first = fs::read(&config.output).unwrap();
    let registry_after_first = registry_lines(&config.registry);

    let summary = generator::run(&config).unwrap();
    let second = fs::read(&config.output).unwrap();

    assert_eq!(first, second);
    assert_eq!(summary.minted, 0);
    assert_eq!(registry_lines(&config.registry), registry_after_first);
}

#[test]
fn test_new_file_keeps_existing_tokens() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let before = components(&fs::read_to_string(&config.output).unwrap());

    build_tree(&build_dir(&temp_dir), &["core/b.dll"]);
    let summary = generator::run(&config).unwrap();
    let after = components(&fs::read_to_string(&config.output).unwrap());

    assert_eq!(summary.minted, 1);
    assert_eq!(registry_lines(&config.registry).len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].0, "COREDIR.b.dll");
}

#[test]
fn test_reserved_executable_is_left_out() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(
        &build_dir(&temp_dir),
        &["core/BitcoenWallet.exe", "core/readme.txt", "core/sub/"],
    );
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let document = fs::read_to_string(&config.output).unwrap();

    let ids: Vec<String> = components(&document).into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["COREDIR.readme.txt"]);
    assert!(document.contains("<Directory Id=\"COREDIR.sub\" Name=\"sub\">"));
    // Only the fixed reference to the externally declared component remains
    assert_eq!(
        component_refs(&document)
            .iter()
            .filter(|id| id.as_str() == "BitcoenWallet.exe")
            .count(),
        1
    );
}

#[cfg(unix)]
#[test]
fn test_markup_in_file_names_is_escaped() {
    let temp_dir = TempDir::new().unwrap();
    let name = "R&D <draft> \"q\" 'x'.txt";
    build_tree(&build_dir(&temp_dir), &[&format!("core/{}", name)]);
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let document = fs::read_to_string(&config.output).unwrap();
    let doc = roxmltree::Document::parse(&document).unwrap();

    let file = doc
        .descendants()
        .find(|n| n.has_tag_name("File"))
        .unwrap();
    assert_eq!(file.attribute("Name"), Some(name));
    assert_eq!(file.attribute("Id"), Some("COREDIR.R_D__draft___q___x_.txt"));
}

#[test]
fn test_deep_paths_keep_identifiers_short_and_unique() {
    let temp_dir = TempDir::new().unwrap();
    let deep = "a_rather_long_directory_name/".repeat(4);
    build_tree(
        &build_dir(&temp_dir),
        &[
            &format!("core/{}one_file_with_a_long_name.txt", deep),
            &format!("core/{}two_file_with_a_long_name.txt", deep),
        ],
    );
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let document = fs::read_to_string(&config.output).unwrap();
    let doc = roxmltree::Document::parse(&document).unwrap();

    let ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("Directory") || n.has_tag_name("Component"))
        .filter_map(|n| n.attribute("Id"))
        .collect();
    assert!(ids.iter().all(|id| id.len() <= MAX_IDENTIFIER_LEN));
    assert!(ids.iter().any(|id| id.starts_with('_')));
    let unique: HashSet<&&str> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_sibling_names_deriving_to_one_id_abort() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a b.txt", "core/a_b.txt"]);
    let config = core_config(&temp_dir);

    let err = generator::run(&config).unwrap_err();
    match err {
        ManifestError::DuplicateIdentifier { id, first, second } => {
            assert_eq!(id, "COREDIR.a_b.txt");
            assert!(first.ends_with("a b.txt"));
            assert!(second.ends_with("a_b.txt"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!config.output.exists());
}

#[test]
fn test_missing_root_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let mut config = core_config(&temp_dir);
    config.roots.push(RootMapping::new("ELECTRONDIR", "electron"));

    let err = generator::run(&config).unwrap_err();
    match err {
        ManifestError::MissingSource { path } => assert!(path.ends_with("electron")),
        other => panic!("unexpected error: {}", other),
    }
    assert!(!config.output.exists());
}

#[test]
fn test_failed_run_leaves_previous_output_in_place() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let previous = fs::read_to_string(&config.output).unwrap();

    fs::remove_dir_all(build_dir(&temp_dir).join("core")).unwrap();
    assert!(generator::run(&config).is_err());
    assert_eq!(fs::read_to_string(&config.output).unwrap(), previous);
}

#[test]
fn test_malformed_registry_aborts() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let config = core_config(&temp_dir);
    fs::write(&config.registry, "not-a-record\n").unwrap();

    let err = generator::run(&config).unwrap_err();
    assert!(matches!(err, ManifestError::Registry(_)));
    assert!(!config.output.exists());
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let config = core_config(&temp_dir);

    let (document, summary) = generator::dry_run(&config).unwrap();
    assert_eq!(summary.minted, 1);
    assert!(summary.output.is_none());
    assert_eq!(components(&document).len(), 1);
    assert!(!config.registry.exists());
    assert!(!config.output.exists());
}

#[test]
fn test_dry_run_reuses_persisted_tokens() {
    let temp_dir = TempDir::new().unwrap();
    build_tree(&build_dir(&temp_dir), &["core/a.dll"]);
    let config = core_config(&temp_dir);

    generator::run(&config).unwrap();
    let written = fs::read_to_string(&config.output).unwrap();

    let (document, summary) = generator::dry_run(&config).unwrap();
    assert_eq!(summary.minted, 0);
    assert_eq!(document, written);
}
