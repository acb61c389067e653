//! fixtree core library - function discovery and regression-fixture recording
//! for TypeScript and JavaScript codebases

#![deny(warnings)]

// Global invariants enforced in this crate:
// - No global mutable state; each stage takes the previous stage's output
// - No randomness, clocks, threads, or async
// - Deterministic traversal order must be explicit
// - Function bodies never affect signature hashes
// - The artifact is written at most once per run

pub mod coerce;
pub mod config;
pub mod extract;
pub mod hash;
pub mod infer;
pub mod ordered;
pub mod persist;
pub mod prompt;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod tree;
pub mod wizard;

pub use config::ResolvedConfig;
pub use ordered::OrderedMap;
pub use prompt::{Prompter, ScriptedPrompter};
pub use report::render_summary;
pub use tree::{FileEntry, Fixture, FunctionRecord, FunctionTree, TestableProperty};

use anyhow::Result;
use scan::SourceFile;
use std::io::Write;

/// How the wizard stage runs
pub enum RunMode<'a> {
    /// Prompt for every function through the prompter, then write the artifact
    Interactive(&'a mut dyn Prompter),
    /// Carry unchanged answers forward, prompt for nothing, write nothing
    ScanOnly,
}

/// Discovery output before the wizard runs
#[derive(Debug, Clone)]
pub struct Discovery {
    pub tree: FunctionTree,
    /// Keys dropped by orphan pruning
    pub removed: Vec<String>,
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tree: FunctionTree,
    pub removed: Vec<String>,
    /// Set when the artifact was written
    pub written_to: Option<std::path::PathBuf>,
}

/// Build fresh records for every file. Files without functions are left out.
pub fn extract_tree(files: &[SourceFile]) -> FunctionTree {
    let mut tree = FunctionTree::new();
    for file in files {
        let functions: FileEntry = extract::extract_functions(&file.content)
            .iter()
            .map(|signature| {
                (
                    signature.name.as_str(),
                    FunctionRecord::from_signature(signature),
                )
            })
            .collect();
        if !functions.is_empty() {
            tree.insert(file.relative.as_str(), functions);
        }
    }
    tree
}

/// scan → extract → reconcile → infer
pub fn discover(config: &ResolvedConfig, out: &mut dyn Write) -> Result<Discovery> {
    for name in &config.roots {
        if config.root.join(name).is_dir() {
            writeln!(out, "Parsing {} directory...", name)?;
        }
    }

    let files = scan::scan(config);
    let tree = extract_tree(&files);
    for (path, functions) in tree.iter() {
        writeln!(out, "Found {} functions in {}", functions.len(), path)?;
    }

    writeln!(out, "Checking for orphaned entries...")?;
    let reconciled = reconcile::reconcile(tree, config);
    if !reconciled.removed.is_empty() {
        writeln!(
            out,
            "Removing {} orphaned entries: {}",
            reconciled.removed.len(),
            reconciled.removed.join(", ")
        )?;
    }

    writeln!(out, "\nAnalyzing functions and inferring missing information...")?;
    Ok(Discovery {
        tree: infer::analyze(reconciled.tree),
        removed: reconciled.removed,
    })
}

/// Full run: load previous tree, discover, wizard, persist.
///
/// Only a persistence failure is an error; everything before it degrades to
/// warnings and fallbacks.
pub fn run(
    config: &ResolvedConfig,
    mode: RunMode<'_>,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    writeln!(out, "Starting codebase analysis...")?;
    let previous = persist::load_previous(&config.output);
    let discovery = discover(config, out)?;

    let (tree, written_to) = match mode {
        RunMode::Interactive(prompter) => {
            let tree = wizard::run_wizard(discovery.tree, &previous, prompter, out)?;
            persist::save_tree(&config.output, &tree)?;
            writeln!(out, "\nFunction tree saved to {}", config.output.display())?;
            (tree, Some(config.output.clone()))
        }
        RunMode::ScanOnly => (wizard::carry_forward(discovery.tree, &previous), None),
    };

    writeln!(out, "Codebase analysis complete")?;
    writeln!(
        out,
        "Found {} files with {} functions",
        tree.len(),
        tree::function_count(&tree)
    )?;

    Ok(RunSummary {
        tree,
        removed: discovery.removed,
        written_to,
    })
}
