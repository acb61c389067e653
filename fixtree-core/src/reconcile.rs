//! Orphan pruning for the function tree
//!
//! Re-walks the scan roots independently of extraction and drops every tree
//! entry whose file is no longer present or no longer passes the filters.
//!
//! Global invariants enforced:
//! - Every surviving key names a file that exists and passes the scan filters
//! - Survivors keep their original order
//! - Renames are not tracked: the old path is dropped, the new path is new

use crate::config::ResolvedConfig;
use crate::scan::collect_source_paths;
use crate::tree::FunctionTree;
use std::collections::HashSet;

/// Pruning result
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub tree: FunctionTree,
    /// Removed file keys, in their original tree order
    pub removed: Vec<String>,
}

/// Relative paths of every file currently eligible for scanning
pub fn existing_files(config: &ResolvedConfig) -> HashSet<String> {
    collect_source_paths(config)
        .into_iter()
        .map(|source| source.relative)
        .collect()
}

/// Drop entries whose key is not in `existing`
pub fn remove_orphans(mut tree: FunctionTree, existing: &HashSet<String>) -> ReconcileResult {
    let removed: Vec<String> = tree
        .keys()
        .filter(|path| !existing.contains(*path))
        .map(str::to_string)
        .collect();
    tree.retain(|path, _| existing.contains(path));
    ReconcileResult { tree, removed }
}

/// Re-walk the roots and prune the tree against what is on disk now
pub fn reconcile(tree: FunctionTree, config: &ResolvedConfig) -> ReconcileResult {
    remove_orphans(tree, &existing_files(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileEntry;
    use std::fs;

    fn tree_with(paths: &[&str]) -> FunctionTree {
        paths.iter().map(|p| (*p, FileEntry::new())).collect()
    }

    #[test]
    fn test_remove_orphans_keeps_order() {
        let existing: HashSet<String> = ["server/a.ts", "client/c.ts"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = remove_orphans(
            tree_with(&["client/c.ts", "server/removed.ts", "server/a.ts"]),
            &existing,
        );
        assert_eq!(result.removed, vec!["server/removed.ts"]);
        assert_eq!(
            result.tree.keys().collect::<Vec<_>>(),
            vec!["client/c.ts", "server/a.ts"]
        );
    }

    #[test]
    fn test_reconcile_against_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("server/actions")).unwrap();
        fs::write(dir.path().join("server/actions/kept.ts"), "").unwrap();

        let config = ResolvedConfig::for_root(dir.path()).unwrap();
        let result = reconcile(
            tree_with(&["server/actions/kept.ts", "server/actions/removed.ts"]),
            &config,
        );
        assert_eq!(result.removed, vec!["server/actions/removed.ts"]);
        assert!(result.tree.contains_key("server/actions/kept.ts"));
        assert!(!result.tree.contains_key("server/actions/removed.ts"));
    }

    #[test]
    fn test_excluded_file_counts_as_orphan() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("server/dist")).unwrap();
        fs::write(dir.path().join("server/dist/out.js"), "").unwrap();

        let config = ResolvedConfig::for_root(dir.path()).unwrap();
        let result = reconcile(tree_with(&["server/dist/out.js"]), &config);
        assert!(result.tree.is_empty());
    }
}
