//! Build Tree Traversal
//!
//! Turns the directories below the build output into manifest nodes.

pub mod path;
pub mod walker;
