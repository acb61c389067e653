//! Function signature extraction
//!
//! Lightweight pattern matching over TypeScript/JavaScript text. This is a
//! heuristic scanner, not a parser: parameter lists stop at the first `)`, and
//! parameters are split on every comma regardless of generics or nesting.
//!
//! Global invariants enforced:
//! - Patterns are applied in table order; matches within a pattern in document order
//! - The first match that captures a name wins; later matches for it are ignored
//! - Output order is the order in which names were first accepted
//!
//! The pattern table is plain data (`SIGNATURE_PATTERNS`) so it can be swapped
//! or tested in isolation through `PatternSet::new`.

use crate::ordered::OrderedMap;
use crate::tree::{FunctionSignature, ANY_TYPE};
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Syntactic form a pattern recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Declaration,
    Arrow,
    Method,
    Async,
    ClassMethod,
    ObjectMethod,
    Export,
}

/// One entry in the pattern table.
///
/// `source` must define the named groups `name` and `params`; `ret` is optional
/// and captures the return annotation when present.
#[derive(Debug, Clone, Copy)]
pub struct SignaturePattern {
    pub kind: PatternKind,
    pub source: &'static str,
}

/// Built-in pattern table, in priority order
pub const SIGNATURE_PATTERNS: &[SignaturePattern] = &[
    // function foo(a: T): R {
    SignaturePattern {
        kind: PatternKind::Declaration,
        source: r"function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Declaration,
        source: r"function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{",
    },
    // const foo = (a: T): R => {
    SignaturePattern {
        kind: PatternKind::Arrow,
        source: r"const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*=>\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Arrow,
        source: r"const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*=>\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Arrow,
        source: r"const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^;]+?)\s*=>",
    },
    SignaturePattern {
        kind: PatternKind::Arrow,
        source: r"const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*=>",
    },
    // foo(a: T): R {
    SignaturePattern {
        kind: PatternKind::Method,
        source: r"(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Method,
        source: r"(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{",
    },
    // async function foo(a: T): R {   /   async foo(a: T): R => {
    SignaturePattern {
        kind: PatternKind::Async,
        source: r"async\s+function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Async,
        source: r"async\s+function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Async,
        source: r"async\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*=>\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Async,
        source: r"async\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*=>\s*\{",
    },
    // private foo(a: T): R {
    SignaturePattern {
        kind: PatternKind::ClassMethod,
        source: r"(?m)^\s*(?:(?:public|private|protected)\s+)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::ClassMethod,
        source: r"(?m)^\s*(?:(?:public|private|protected)\s+)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{",
    },
    // foo: function (a: T): R {   /   foo: (a: T): R => {
    SignaturePattern {
        kind: PatternKind::ObjectMethod,
        source: r"(?P<name>\w+)\s*:\s*function\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::ObjectMethod,
        source: r"(?P<name>\w+)\s*:\s*function\s*\((?P<params>[^)]*)\)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::ObjectMethod,
        source: r"(?P<name>\w+)\s*:\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*=>\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::ObjectMethod,
        source: r"(?P<name>\w+)\s*:\s*\((?P<params>[^)]*)\)\s*=>\s*\{",
    },
    // export function foo(a: T): R {   /   export const foo = (a: T): R => {
    SignaturePattern {
        kind: PatternKind::Export,
        source: r"export\s+function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Export,
        source: r"export\s+function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Export,
        source: r"export\s+const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ret>[^{]*?)\s*=>\s*\{",
    },
    SignaturePattern {
        kind: PatternKind::Export,
        source: r"export\s+const\s+(?P<name>\w+)\s*=\s*\((?P<params>[^)]*)\)\s*=>\s*\{",
    },
];

/// Keywords that the looser patterns can capture as if they were names
const RESERVED_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "throw", "try", "else", "do", "function",
];

/// A compiled pattern table
#[derive(Debug)]
pub struct PatternSet {
    compiled: Vec<(PatternKind, Regex)>,
}

impl PatternSet {
    /// Compile a pattern table. Fails if a source is not a valid regex or lacks
    /// the `name`/`params` groups.
    pub fn new(patterns: &[SignaturePattern]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern.source)
                .with_context(|| format!("invalid signature pattern: {}", pattern.source))?;
            let groups: Vec<&str> = regex.capture_names().flatten().collect();
            if !groups.contains(&"name") || !groups.contains(&"params") {
                anyhow::bail!(
                    "signature pattern must define `name` and `params` groups: {}",
                    pattern.source
                );
            }
            compiled.push((pattern.kind, regex));
        }
        Ok(PatternSet { compiled })
    }

    /// The built-in table, compiled once
    pub fn builtin() -> &'static PatternSet {
        static BUILTIN: OnceLock<PatternSet> = OnceLock::new();
        BUILTIN.get_or_init(|| PatternSet::new(SIGNATURE_PATTERNS).unwrap())
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Extract signatures from file text, first match per name wins.
    pub fn extract(&self, content: &str) -> Vec<FunctionSignature> {
        let mut found: OrderedMap<FunctionSignature> = OrderedMap::new();

        for (_, regex) in &self.compiled {
            for caps in regex.captures_iter(content) {
                let Some(name) = caps.name("name").map(|m| m.as_str()) else {
                    continue;
                };
                if found.contains_key(name) || !is_valid_function_name(name) {
                    continue;
                }
                let params = caps.name("params").map_or("", |m| m.as_str());
                let declared_return = caps
                    .name("ret")
                    .map_or_else(|| ANY_TYPE.to_string(), |m| m.as_str().to_string());

                found.insert_if_absent(
                    name,
                    FunctionSignature {
                        name: name.to_string(),
                        parameters: parse_parameters(params),
                        declared_return,
                    },
                );
            }
        }

        found.into_iter().map(|(_, signature)| signature).collect()
    }

    /// Which pattern kind first accepts `name` in `content`, if any
    pub fn winning_kind(&self, content: &str, name: &str) -> Option<PatternKind> {
        self.compiled.iter().find_map(|(kind, regex)| {
            regex
                .captures_iter(content)
                .any(|caps| caps.name("name").is_some_and(|m| m.as_str() == name))
                .then_some(*kind)
        })
    }
}

/// Extract signatures with the built-in pattern table
pub fn extract_functions(content: &str) -> Vec<FunctionSignature> {
    PatternSet::builtin().extract(content)
}

/// Reject reserved words and anything that is not an ASCII identifier.
pub fn is_valid_function_name(name: &str) -> bool {
    if RESERVED_NAMES.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let ident_start = |c: char| c.is_ascii_alphabetic() || c == '_' || c == '$';
    ident_start(first) && chars.all(|c| ident_start(c) || c.is_ascii_digit())
}

/// Split a raw parameter list into name → type pairs.
///
/// Splits on every comma, then each parameter on its first colon. Untyped
/// parameters get `any`.
pub fn parse_parameters(params: &str) -> OrderedMap<String> {
    let mut parsed = OrderedMap::new();
    if params.trim().is_empty() {
        return parsed;
    }

    for param in params.split(',').map(str::trim) {
        if param.is_empty() {
            continue;
        }
        let (name, ty) = match param.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.trim()),
            None => (param, ""),
        };
        if name.is_empty() {
            continue;
        }
        let ty = if ty.is_empty() { ANY_TYPE } else { ty };
        parsed.insert(name, ty.to_string());
    }

    parsed
}

#[cfg(test)]
#[path = "extract/tests.rs"]
mod tests;
