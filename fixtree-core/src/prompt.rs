//! Line-oriented operator input
//!
//! The wizard asks questions through the `Prompter` trait so the real terminal
//! can be swapped for scripted answers in tests and automation.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Answer used when the input stream is closed or fails
pub const FALLBACK_ANSWER: &str = "default_value";

/// Source of operator answers, one line per question.
pub trait Prompter {
    /// Show `question` and return the trimmed answer.
    ///
    /// Must not fail: a broken or exhausted input yields `FALLBACK_ANSWER`.
    fn ask(&mut self, question: &str) -> String;
}

/// Prompts on a writer and reads answers from a buffered reader.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str) -> String {
        // A prompt that cannot be shown still gets an answer read
        if let Err(e) = write!(self.output, "{}", question).and_then(|_| self.output.flush()) {
            eprintln!("warning: could not show prompt ({})", e);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                eprintln!("warning: input closed, using {:?}", FALLBACK_ANSWER);
                FALLBACK_ANSWER.to_string()
            }
            Ok(_) => line.trim().to_string(),
            Err(e) => {
                eprintln!("warning: failed to read input ({}), using {:?}", e, FALLBACK_ANSWER);
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

/// Terminal prompter over stdin/stdout
pub type StdinPrompter = LinePrompter<std::io::StdinLock<'static>, std::io::Stdout>;

/// Build a prompter bound to the process's stdin and stdout
pub fn stdin_prompter() -> StdinPrompter {
    LinePrompter::new(std::io::stdin().lock(), std::io::stdout())
}

/// Replays predetermined answers in order and records the questions asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> String {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
    }
}
