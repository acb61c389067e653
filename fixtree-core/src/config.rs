//! Configuration file support for fixtree
//!
//! Loads scan settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.fixtreerc.json` in the working directory
//! 3. `fixtree.config.json` in the working directory
//! 4. `"fixtree"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scan root relative to the working directory
pub const DEFAULT_ROOT: &str = "..";

/// Artifact path relative to the working directory
pub const DEFAULT_OUTPUT: &str = "unit_tests.json";

/// Top-level directories under the root that are scanned, in order
pub const DEFAULT_ROOTS: &[&str] = &["client", "server", "contracts"];

/// Supported source extensions (without the dot)
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx"];

/// Directory names never descended into, at any depth
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", ".next"];

/// File names never scanned: the tool's own script and artifact
pub const DEFAULT_EXCLUDE_FILES: &[&str] = &["unit_setup.ts", "unit_tests.json"];

/// fixtree configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtreeConfig {
    /// Directory containing the scanned roots (default: `..`)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Directory names under `root` to scan (default: client, server, contracts)
    #[serde(default)]
    pub roots: Option<Vec<String>>,

    /// File extensions to scan, without the leading dot
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Directory names skipped at any depth
    #[serde(default)]
    pub exclude_dirs: Option<Vec<String>>,

    /// File names skipped at any depth
    #[serde(default)]
    pub exclude_files: Option<Vec<String>>,

    /// Extra glob patterns matched against root-relative paths
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Artifact path (default: `unit_tests.json`)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration with compiled glob patterns and absolute paths
#[derive(Debug)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub roots: Vec<String>,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    /// Compiled extra exclude patterns
    pub exclude: GlobSet,
    /// Source patterns of `exclude`, kept for display
    pub exclude_patterns: Vec<String>,
    pub output: PathBuf,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl FixtreeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref roots) = self.roots {
            if roots.is_empty() {
                anyhow::bail!("roots must name at least one directory");
            }
            for root in roots {
                if root.is_empty()
                    || root.contains('/')
                    || root.contains('\\')
                    || root == "."
                    || root == ".."
                {
                    anyhow::bail!("roots entries must be plain directory names (got {:?})", root);
                }
            }
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.is_empty() {
                anyhow::bail!("extensions must list at least one extension");
            }
            for ext in extensions {
                if ext.is_empty() || ext.starts_with('.') {
                    anyhow::bail!(
                        "extensions must be given without a leading dot (got {:?})",
                        ext
                    );
                }
            }
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                anyhow::bail!("output must not be empty");
            }
        }

        // Validate glob patterns compile
        for pattern in &self.exclude {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        }

        Ok(())
    }

    /// Resolve config into compiled form; relative paths resolve against `working_dir`
    pub fn resolve(&self, working_dir: &Path) -> Result<ResolvedConfig> {
        self.validate()?;

        let exclude = {
            let mut builder = GlobSetBuilder::new();
            for pattern in &self.exclude {
                builder.add(Glob::new(pattern)?);
            }
            builder.build()?
        };

        let root = working_dir.join(self.root.as_deref().unwrap_or(Path::new(DEFAULT_ROOT)));
        let output = working_dir.join(self.output.as_deref().unwrap_or(Path::new(DEFAULT_OUTPUT)));

        Ok(ResolvedConfig {
            root,
            roots: self.roots.clone().unwrap_or_else(|| owned(DEFAULT_ROOTS)),
            extensions: self
                .extensions
                .clone()
                .unwrap_or_else(|| owned(DEFAULT_EXTENSIONS)),
            exclude_dirs: self
                .exclude_dirs
                .clone()
                .unwrap_or_else(|| owned(DEFAULT_EXCLUDE_DIRS)),
            exclude_files: self
                .exclude_files
                .clone()
                .unwrap_or_else(|| owned(DEFAULT_EXCLUDE_FILES)),
            exclude,
            exclude_patterns: self.exclude.clone(),
            output,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults(working_dir: &Path) -> Result<Self> {
        FixtreeConfig::default().resolve(working_dir)
    }

    /// Defaults, scanning `root` directly
    pub fn for_root(root: &Path) -> Result<Self> {
        let mut resolved = Self::defaults(root)?;
        resolved.root = root.to_path_buf();
        Ok(resolved)
    }

    /// True if a directory with this name is never descended into
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    /// True if a file name has a supported extension and is not excluded by name
    pub fn is_supported_file(&self, name: &str) -> bool {
        if self.exclude_files.iter().any(|f| f == name) {
            return false;
        }
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }

    /// Check a root-relative path against the extra exclude globs
    pub fn should_include(&self, relative_path: &str) -> bool {
        !self.exclude.is_match(relative_path)
    }
}

/// Discover and load a config file from the working directory
///
/// Search order:
/// 1. `.fixtreerc.json`
/// 2. `fixtree.config.json`
/// 3. `"fixtree"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(working_dir: &Path) -> Result<Option<(FixtreeConfig, PathBuf)>> {
    for name in [".fixtreerc.json", "fixtree.config.json"] {
        let path = working_dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = working_dir.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<FixtreeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: FixtreeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load fixtree config from the "fixtree" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<FixtreeConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("fixtree") {
        Some(value) => {
            let config: FixtreeConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid fixtree config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid fixtree config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a working directory
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in the working directory.
/// Returns default config if nothing is found.
pub fn load_and_resolve(working_dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(working_dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (FixtreeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve(working_dir)?;
    resolved.config_path = source_path;
    Ok(resolved)
}
