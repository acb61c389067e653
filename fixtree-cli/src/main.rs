//! fixtree CLI - discovers functions and records regression fixtures for them

#![deny(warnings)]

// Global invariants enforced:
// - Prompts are answered strictly in tree order
// - The artifact is written at most once, after the wizard finishes
// - --scan-only never prompts and never writes

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixtree_core::config::{self, ResolvedConfig};
use fixtree_core::prompt::stdin_prompter;
use fixtree_core::{render_summary, run, RunMode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fixtree")]
#[command(about = "Discover TypeScript/JavaScript functions and record test fixtures for them")]
#[command(version = env!("FIXTREE_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the scanned roots (overrides config file)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Artifact path (overrides config file)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to config file (default: auto-discover)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan and summarize without prompting or writing the artifact
    #[arg(long)]
    scan_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scanning
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let working_dir = std::env::current_dir()?;

    match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Validate { path } => {
                match config::load_and_resolve(&working_dir, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = config::load_and_resolve(&working_dir, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
        None => {
            let mut resolved = config::load_and_resolve(&working_dir, cli.config.as_deref())
                .context("failed to load configuration")?;
            if let Some(config_path) = &resolved.config_path {
                eprintln!("Using config: {}", config_path.display());
            }

            // CLI flags override config file values
            if let Some(root) = cli.root {
                resolved.root = absolutize(&working_dir, root);
            }
            if let Some(output) = cli.output {
                resolved.output = absolutize(&working_dir, output);
            }

            if !resolved.root.is_dir() {
                eprintln!(
                    "warning: scan root does not exist: {}",
                    resolved.root.display()
                );
            }

            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = if cli.scan_only {
                run(&resolved, RunMode::ScanOnly, &mut out)
            } else {
                let mut prompter = stdin_prompter();
                run(&resolved, RunMode::Interactive(&mut prompter), &mut out)
            }
            .context("analysis failed")?;

            write!(out, "{}", render_summary(&summary.tree))?;
            writeln!(out, "\nOrphaned entries removed: {}", summary.removed.len())?;
            match &summary.written_to {
                Some(path) => writeln!(out, "Artifact written: {}", path.display())?,
                None => writeln!(out, "Artifact not written (--scan-only)")?,
            }
        }
    }

    Ok(())
}

fn absolutize(working_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        working_dir.join(path)
    } else {
        path
    }
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Scan:");
    println!("  root: {}", resolved.root.display());
    println!("  roots: {}", resolved.roots.join(", "));
    println!("  extensions: {}", resolved.extensions.join(", "));
    println!();
    println!("Filters:");
    println!("  exclude_dirs: {}", resolved.exclude_dirs.join(", "));
    println!("  exclude_files: {}", resolved.exclude_files.join(", "));
    println!(
        "  exclude: {}",
        if resolved.exclude_patterns.is_empty() {
            "none".to_string()
        } else {
            resolved.exclude_patterns.join(", ")
        }
    );
    println!();
    println!("Output:");
    println!("  artifact: {}", resolved.output.display());
}
