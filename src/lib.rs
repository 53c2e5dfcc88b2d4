//! Wixfiles: WiX File Manifest Generation
//!
//! Walks a build output tree and emits a WiX include (`files.wxi`) that
//! declares every file as a component. Component GUIDs are kept stable across
//! regenerations by an append-only identity registry (`guids.lst`).

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod manifest;
pub mod registry;
pub mod tree;
