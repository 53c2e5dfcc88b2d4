//! WiX include document serialization

use crate::manifest::{Manifest, ManifestNode};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

const INDENT: &str = "    ";

/// Fixed parts of the generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Encoding named in the XML declaration. The document is written as UTF-8.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_feature_id")]
    pub feature_id: String,

    #[serde(default = "default_feature_level")]
    pub feature_level: u32,

    /// Component declared elsewhere that installs the main executable
    #[serde(default = "default_executable_component")]
    pub executable_component: String,

    /// Component declared elsewhere that owns the program menu shortcut
    #[serde(default = "default_shortcut_component")]
    pub shortcut_component: String,

    /// Render `Source` paths with `\` regardless of host platform
    #[serde(default = "default_true")]
    pub windows_separators: bool,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_feature_id() -> String {
    "Complete".to_string()
}

fn default_feature_level() -> u32 {
    1
}

fn default_executable_component() -> String {
    "BitcoenWallet.exe".to_string()
}

fn default_shortcut_component() -> String {
    "ProgramMenuDir".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            feature_id: default_feature_id(),
            feature_level: default_feature_level(),
            executable_component: default_executable_component(),
            shortcut_component: default_shortcut_component(),
            windows_separators: default_true(),
        }
    }
}

/// Escape text for use inside an XML attribute value.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a path with the separator the document uses.
pub fn render_path(path: &Path, windows_separators: bool) -> String {
    let sep = if windows_separators { "\\" } else { "/" };
    let mut out = String::new();
    let mut need_sep = false;
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                out.push_str(&prefix.as_os_str().to_string_lossy());
                need_sep = false;
            }
            Component::RootDir => {
                out.push_str(sep);
                need_sep = false;
            }
            other => {
                if need_sep {
                    out.push_str(sep);
                }
                out.push_str(&other.as_os_str().to_string_lossy());
                need_sep = true;
            }
        }
    }
    out
}

/// Serialize a manifest into a WiX include document.
pub fn serialize(manifest: &Manifest, options: &DocumentOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<?xml version=\"1.0\" encoding=\"{}\"?>\n",
        escape(&options.encoding)
    ));
    out.push_str("<Include>\n");

    for root in &manifest.roots {
        push_line(&mut out, 1, &format!("<DirectoryRef Id=\"{}\">", escape(&root.id)));
        write_nodes(&mut out, &root.children, 2, options);
        push_line(&mut out, 1, "</DirectoryRef>");
    }

    push_line(
        &mut out,
        1,
        &format!(
            "<Feature Id=\"{}\" Level=\"{}\">",
            escape(&options.feature_id),
            options.feature_level
        ),
    );
    push_component_ref(&mut out, &options.executable_component);
    for id in manifest.component_ids() {
        push_component_ref(&mut out, id);
    }
    push_component_ref(&mut out, &options.shortcut_component);
    push_line(&mut out, 1, "</Feature>");

    out.push_str("</Include>\n");
    out
}

fn write_nodes(out: &mut String, nodes: &[ManifestNode], depth: usize, options: &DocumentOptions) {
    for node in nodes {
        match node {
            ManifestNode::Directory(dir) => {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<Directory Id=\"{}\" Name=\"{}\">",
                        escape(&dir.id),
                        escape(&dir.name)
                    ),
                );
                write_nodes(out, &dir.children, depth + 1, options);
                push_line(out, depth, "</Directory>");
            }
            ManifestNode::File(file) => {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<Component Id=\"{}\" Guid=\"{}\">",
                        escape(&file.id),
                        escape(&file.stable_id)
                    ),
                );
                push_line(
                    out,
                    depth + 1,
                    &format!(
                        "<File Id=\"{}\" Name=\"{}\" Source=\"{}\" KeyPath=\"yes\" />",
                        escape(&file.id),
                        escape(&file.name),
                        escape(&render_path(&file.source, options.windows_separators))
                    ),
                );
                push_line(out, depth, "</Component>");
            }
        }
    }
}

fn push_component_ref(out: &mut String, id: &str) {
    push_line(out, 2, &format!("<ComponentRef Id=\"{}\" />", escape(id)));
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
