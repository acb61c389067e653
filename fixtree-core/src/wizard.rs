//! Interactive fixture wizard
//!
//! Walks the tree file by file, function by function, and asks the operator
//! for test inputs and an expected result.
//!
//! Global invariants enforced:
//! - Strictly sequential: one question at a time, in tree order
//! - Never aborts on bad input: coercion and input failures degrade to fallbacks
//! - The input tree is consumed and a new tree is returned
//!
//! Record states:
//! - `New`: no previous record; fully prompted
//! - `Unchanged`: previous record with the same hash; fully prompted again
//! - `Changed`: hash differs; the operator may keep the previous answers

use crate::coerce::coerce;
use crate::prompt::Prompter;
use crate::tree::{collides_with_marker, FileEntry, Fixture, FunctionRecord, FunctionTree};
use anyhow::Result;
use std::io::Write;

/// Answer that marks an expected result as unknowable (any case)
pub const UNKNOWN_ANSWER: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    New,
    Unchanged,
    Changed,
}

/// Compare a freshly built record against the previous run's record.
pub fn classify(current: &FunctionRecord, previous: Option<&FunctionRecord>) -> RecordState {
    match previous {
        None => RecordState::New,
        Some(prev) if prev.signature_hash == current.signature_hash => RecordState::Unchanged,
        Some(_) => RecordState::Changed,
    }
}

/// Look up `file` / `function` in a tree
pub fn previous_record<'a>(
    previous: &'a FunctionTree,
    file: &str,
    function: &str,
) -> Option<&'a FunctionRecord> {
    previous.get(file).and_then(|functions| functions.get(function))
}

/// Returns true only for an explicit refusal (`n` / `no`, any case).
fn declines_update(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no")
}

/// Coerce an answer, warning when it will not survive a save/load cycle.
fn recorded_value(answer: &str, ty: &str) -> Fixture {
    let value = coerce(answer, ty);
    if collides_with_marker(&value) {
        eprintln!(
            "warning: answer {} matches a placeholder marker and will reload as a placeholder",
            value
        );
    }
    Fixture::Value(value)
}

fn returns_nothing(return_type: &str) -> bool {
    return_type == "void" || return_type == "undefined"
}

/// Run the wizard over every function in `tree`.
///
/// `out` receives the transcript (headers, notices); questions go through
/// `prompter`.
pub fn run_wizard(
    tree: FunctionTree,
    previous: &FunctionTree,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> Result<FunctionTree> {
    writeln!(out, "\nStarting function test wizard...")?;

    let mut configured = FunctionTree::new();
    for (file_path, functions) in tree {
        writeln!(out, "\nProcessing file: {}", file_path)?;

        let mut entry = FileEntry::new();
        for (name, record) in functions {
            let prior = previous_record(previous, &file_path, &name);
            let record = configure_function(&name, record, prior, prompter, out)?;
            entry.insert(name, record);
        }
        configured.insert(file_path, entry);
    }

    Ok(configured)
}

fn configure_function(
    name: &str,
    mut record: FunctionRecord,
    prior: Option<&FunctionRecord>,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> Result<FunctionRecord> {
    writeln!(out, "\nFunction: {}", name)?;
    writeln!(out, "   Return type: {}", record.normalized_return)?;
    writeln!(out, "   Testable properties: {}", record.testable_label())?;

    if let (RecordState::Changed, Some(prev)) = (classify(&record, prior), prior) {
        writeln!(out, "Function {} has changed!", name)?;
        let answer = prompter.ask("Do you want to update test parameters? (y/n): ");
        if declines_update(&answer) {
            record.test_inputs = prev.test_inputs.clone();
            record.expected_result = prev.expected_result.clone();
            writeln!(out, "Kept previous test parameters for {}", name)?;
            return Ok(record);
        }
    }

    let parameters: Vec<(String, String)> = record
        .parameters
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    for (arg, ty) in parameters {
        writeln!(out, "\nArgument: {} ({})", arg, ty)?;
        let answer = prompter.ask(&format!("Enter test value for {}: ", arg));
        record.test_inputs.insert(arg, recorded_value(&answer, &ty));
    }

    writeln!(
        out,
        "\nExpected result for {} ({})",
        name, record.normalized_return
    )?;
    record.expected_result = if returns_nothing(&record.normalized_return) {
        writeln!(out, "Function returns void/undefined - no result needed")?;
        Fixture::Undefined
    } else {
        let answer = prompter.ask("Enter expected result value (or \"unknown\"): ");
        if answer.eq_ignore_ascii_case(UNKNOWN_ANSWER) {
            Fixture::Unknown
        } else {
            recorded_value(&answer, &record.normalized_return)
        }
    };

    writeln!(out, "Function {} configured", name)?;
    Ok(record)
}

/// Non-interactive pass: copy previous answers onto records whose hash is
/// unchanged. Everything else keeps its pending placeholders.
pub fn carry_forward(tree: FunctionTree, previous: &FunctionTree) -> FunctionTree {
    tree.map_values(|file_path, functions| {
        functions.map_values(|name, mut record| {
            let prior = previous_record(previous, file_path, name);
            if let (RecordState::Unchanged, Some(prev)) = (classify(&record, prior), prior) {
                record.test_inputs = prev.test_inputs.clone();
                record.expected_result = prev.expected_result.clone();
            }
            record
        })
    })
}
