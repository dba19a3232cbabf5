//! Renderer invocation and artifact output.
//!
//! Each embedded command is rendered by one blocking invocation of the
//! external renderer. The invocation is built as an argument vector handed
//! directly to the process spawner and the child's stdout is captured and
//! written to the artifact path by this module, so no shell is involved at
//! any point.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::consts::SINGLE_FLAG;
use crate::scan::EmbeddedCommand;

/// External renderer invocation: program plus base arguments.
///
/// The default builds and runs the renderer crate in the working directory,
/// `cargo run --release --`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    /// Program to spawn.
    pub program: String,
    /// Arguments preceding `--single` and the captured options.
    pub args: Vec<String>,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: "cargo".to_owned(),
            args: vec!["run".to_owned(), "--release".to_owned(), "--".to_owned()],
        }
    }
}

/// Result of one completed renderer invocation.
///
/// Carries the exit status and captured streams so callers can assert
/// success without inspecting the filesystem.
#[derive(Debug)]
pub struct RenderOutcome {
    /// The embedded command that was rendered.
    pub command: EmbeddedCommand,
    /// Path the captured stdout was written to.
    pub path: PathBuf,
    /// Exit status of the renderer process.
    pub status: ExitStatus,
    /// Number of stdout bytes captured and written.
    pub stdout_len: usize,
    /// Captured stderr, kept for diagnostics.
    pub stderr: Vec<u8>,
}

impl RenderOutcome {
    /// Whether the renderer exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Renderer invocation error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer process could not be spawned.
    #[error("failed to run renderer '{program}': {source}")]
    Spawn {
        /// Program that failed to spawn.
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The captured output could not be written to the artifact path.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Artifact path that failed to write.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Drives the external renderer, one invocation per embedded command.
///
/// Captured options are split on whitespace and appended after `--single`
/// as discrete arguments, so shell-meaningful characters inside them are
/// passed through as inert text. Quoting is not interpreted.
pub struct Renderer {
    command: RendererCommand,
    output_dir: PathBuf,
}

impl Renderer {
    /// Create a renderer writing artifacts under `output_dir`.
    #[must_use]
    pub fn new(command: RendererCommand, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            output_dir: output_dir.into(),
        }
    }

    /// Artifact path for an embedded command: `<output-dir>/<filename>.svg`.
    #[must_use]
    pub fn output_path(&self, command: &EmbeddedCommand) -> PathBuf {
        self.output_dir.join(format!("{}.svg", command.filename))
    }

    /// Invoke the renderer for one embedded command, blocking until it
    /// exits, and write the captured stdout to the artifact path.
    ///
    /// The artifact is written regardless of the exit status, matching the
    /// output redirection this invocation replaces; the returned
    /// [`RenderOutcome`] carries the status for the caller to judge. Each
    /// command is attempted exactly once, with no retry or timeout.
    pub fn render(&self, command: &EmbeddedCommand) -> Result<RenderOutcome, RenderError> {
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(SINGLE_FLAG)
            .args(command.options.split_whitespace())
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        let path = self.output_path(command);
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, &output.stdout).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(RenderOutcome {
            command: command.clone(),
            path,
            status: output.status,
            stdout_len: output.stdout.len(),
            stderr: output.stderr,
        })
    }
}
