use std::path::Path;

use super::error::{DocumentError, Result};
use super::tree::ConfigTree;

/// Reads a UTF-8 JSON document from disk.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<ConfigTree> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| DocumentError::ParseJson {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_document(content: &str) -> Result<ConfigTree> {
    serde_json::from_str(content).map_err(|e| DocumentError::ParseJson {
        path: Path::new("<inline>").to_path_buf(),
        source: e,
    })
}

/// Renders a tree as indented JSON with a trailing newline.
pub fn render_document(tree: &ConfigTree) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(tree)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Writes a tree to disk as indented JSON, replacing any existing file.
pub fn write_document<P: AsRef<Path>>(path: P, tree: &ConfigTree) -> Result<()> {
    let path = path.as_ref();
    let rendered = render_document(tree)?;
    std::fs::write(path, rendered).map_err(|e| DocumentError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
