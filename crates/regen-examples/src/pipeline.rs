//! Whole-document regeneration pipeline.
//!
//! Connects the scanner to the renderer: each line is scanned for embedded
//! commands and every command triggers one blocking invocation, in document
//! order. Results are collected into a [`RunReport`] rather than logged from
//! library code, leaving presentation to the caller.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::render::{RenderError, RenderOutcome, Renderer};
use crate::scan::{EmbeddedCommand, ScanPattern};

/// An invocation that could not be issued or whose output could not be
/// written.
#[derive(Debug)]
pub struct RenderFailure {
    /// The embedded command the invocation was built from.
    pub command: EmbeddedCommand,
    /// What went wrong.
    pub error: RenderError,
}

/// Collected results of one regeneration run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Invocations that ran to completion, in document order. A completed
    /// invocation may still have exited non-zero; see [`RenderOutcome::success`].
    pub outcomes: Vec<RenderOutcome>,
    /// Invocations that never completed (spawn or write errors).
    pub failures: Vec<RenderFailure>,
}

impl RunReport {
    /// Total number of embedded commands found in the document.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len() + self.failures.len()
    }

    /// Number of failed invocations: spawn/write errors plus renderers that
    /// exited with a non-zero status.
    #[must_use]
    pub fn failed(&self) -> usize {
        let unsuccessful = self.outcomes.iter().filter(|o| !o.success()).count();
        self.failures.len() + unsuccessful
    }

    /// Whether every invocation completed with a zero exit status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Scans a document and regenerates one artifact per embedded command.
pub struct Pipeline {
    pattern: ScanPattern,
    renderer: Renderer,
}

impl Pipeline {
    /// Create a pipeline from a scan pattern and a renderer.
    #[must_use]
    pub fn new(pattern: ScanPattern, renderer: Renderer) -> Self {
        Self { pattern, renderer }
    }

    /// Regenerate every embedded command found in the document.
    ///
    /// Lines are processed in order and each invocation runs to completion
    /// before the next begins. A failed invocation is recorded in the report
    /// and the run continues with the next command; only a read error on the
    /// document itself aborts the run.
    pub fn run(&self, reader: impl BufRead) -> io::Result<RunReport> {
        let mut report = RunReport::default();

        for line in reader.lines() {
            let line = line?;
            for command in self.pattern.commands(&line) {
                tracing::debug!(filename = %command.filename, "rendering example");
                match self.renderer.render(&command) {
                    Ok(outcome) => report.outcomes.push(outcome),
                    Err(error) => report.failures.push(RenderFailure { command, error }),
                }
            }
        }

        Ok(report)
    }

    /// Regenerate from a document on disk. See [`Pipeline::run`].
    pub fn run_file(&self, path: &Path) -> io::Result<RunReport> {
        let file = File::open(path)?;
        self.run(BufReader::new(file))
    }
}
