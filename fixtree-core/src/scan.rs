//! Source tree scanning
//!
//! Global invariants enforced:
//! - Roots are visited in configured order; entries within a directory in
//!   byte-wise name order
//! - Symlinks are never followed
//! - An unreadable directory or file is a warning, never an error
//! - Relative paths use `/` separators regardless of platform

use crate::config::ResolvedConfig;
use std::path::{Path, PathBuf};

/// A file that passed every filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    pub absolute: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative: String,
}

/// A scanned file with its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub relative: String,
    pub content: String,
}

/// Normalize a path under `root` to a `/`-separated relative string
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Enumerate every file under the configured roots that passes the filters.
pub fn collect_source_paths(config: &ResolvedConfig) -> Vec<SourcePath> {
    let mut files = Vec::new();
    for name in &config.roots {
        let dir = config.root.join(name);
        if !dir.is_dir() {
            continue;
        }
        collect_recursive(config, &dir, &mut files);
    }
    files
}

fn collect_recursive(config: &ResolvedConfig, dir: &Path, files: &mut Vec<SourcePath>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("warning: could not read directory {}: {}", dir.display(), e);
            return;
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => eprintln!("warning: could not read entry in {}: {}", dir.display(), e),
        }
    }
    paths.sort();

    for path in paths {
        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                eprintln!("warning: could not process {}: {}", path.display(), e);
                continue;
            }
        };
        process_dir_entry(config, path, metadata, files);
    }
}

/// Process one directory entry, pushing source files or recursing into dirs
fn process_dir_entry(
    config: &ResolvedConfig,
    path: PathBuf,
    metadata: std::fs::Metadata,
    files: &mut Vec<SourcePath>,
) {
    if metadata.file_type().is_symlink() {
        return;
    }
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return;
    };

    if metadata.is_dir() {
        if !config.is_excluded_dir(&name) {
            collect_recursive(config, &path, files);
        }
    } else if metadata.is_file() && config.is_supported_file(&name) {
        let Some(relative) = relative_path(&config.root, &path) else {
            return;
        };
        if config.should_include(&relative) {
            files.push(SourcePath {
                absolute: path,
                relative,
            });
        }
    }
}

/// Enumerate and read every source file. Unreadable files are skipped.
pub fn scan(config: &ResolvedConfig) -> Vec<SourceFile> {
    collect_source_paths(config)
        .into_iter()
        .filter_map(|source| match std::fs::read_to_string(&source.absolute) {
            Ok(content) => Some(SourceFile {
                relative: source.relative,
                content,
            }),
            Err(e) => {
                eprintln!(
                    "warning: could not read file {}: {}",
                    source.absolute.display(),
                    e
                );
                None
            }
        })
        .collect()
}
