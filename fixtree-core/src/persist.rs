//! Function tree persistence
//!
//! Global invariants enforced:
//! - The artifact is written once, at the end of a run, via temp file + rename
//! - A failed write leaves the previous artifact untouched
//! - Loading never fails: a missing or unreadable artifact is an empty tree

use crate::tree::FunctionTree;
use anyhow::{Context, Result};
use std::path::Path;

/// Serialize a tree as pretty-printed JSON (2-space indentation)
pub fn to_json(tree: &FunctionTree) -> Result<String> {
    serde_json::to_string_pretty(tree).context("failed to serialize function tree")
}

/// Parse a tree from JSON
pub fn from_json(json: &str) -> Result<FunctionTree> {
    serde_json::from_str(json).context("failed to parse function tree JSON")
}

/// Load the previous run's tree.
///
/// Returns an empty tree on cold start (file absent). Read or parse errors are
/// reported as warnings and also yield an empty tree.
pub fn load_previous(path: &Path) -> FunctionTree {
    if !path.exists() {
        return FunctionTree::new();
    }
    let loaded = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|json| from_json(&json));
    match loaded {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("warning: ignoring previous function tree: {:#}", e);
            FunctionTree::new()
        }
    }
}

/// Write data to file atomically using temp file + rename
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    use std::fs;
    use std::io::Write;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }

    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync temp file: {}", temp_path.display()))?;
    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Persist the tree to `path`
pub fn save_tree(path: &Path, tree: &FunctionTree) -> Result<()> {
    let json = to_json(tree)?;
    atomic_write(path, &json)
        .with_context(|| format!("failed to save function tree to {}", path.display()))
}
