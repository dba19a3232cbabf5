//! regen CLI - Example image regeneration.
//!
//! Scans the project documentation for embedded renderer command links of
//! the form `![<tool> --single <options>](img/<name>.svg)` and re-runs the
//! renderer once per link, rewriting the linked images so they never drift
//! from the documentation.

mod error;
mod output;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use regen_config::{CliSettings, Config};
use regen_examples::{Pipeline, Renderer, RendererCommand, RunReport, ScanPattern};
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// Regenerate example images from documentation.
///
/// Running with no arguments scans `README.md` (or the configured document)
/// and regenerates every embedded example.
#[derive(Parser)]
#[command(name = "regen", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover regen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document to scan (overrides config).
    #[arg(short, long)]
    docs: Option<PathBuf>,

    /// Directory rendered images are written to (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Renderer program to invoke (overrides config).
    #[arg(long)]
    renderer: Option<String>,

    /// Tool name inside embedded links (overrides config).
    #[arg(long)]
    tool: Option<String>,

    /// List embedded commands without invoking the renderer.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Initialize tracing with appropriate log level
    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(cli, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: &Output) -> Result<(), CliError> {
    let cli_settings = CliSettings {
        docs_file: cli.docs,
        output_dir: cli.output_dir,
        renderer_program: cli.renderer,
        tool_name: cli.tool,
    };
    let config = Config::load(cli.config.as_deref(), Some(&cli_settings))?;
    tracing::debug!(config = ?config.config_path, "configuration loaded");

    output.info(&format!(
        "Document: {}",
        config.docs_resolved.file.display()
    ));

    let pattern = ScanPattern::for_tool(&config.renderer_resolved.name);

    if cli.dry_run {
        return list_commands(&config, &pattern, output);
    }

    output.info(&format!(
        "Output: {}",
        config.output_resolved.dir.display()
    ));

    let renderer = Renderer::new(
        RendererCommand {
            program: config.renderer_resolved.program.clone(),
            args: config.renderer_resolved.args.clone(),
        },
        config.output_resolved.dir.clone(),
    );
    let pipeline = Pipeline::new(pattern, renderer);

    let report = pipeline
        .run_file(&config.docs_resolved.file)
        .map_err(|source| CliError::Document {
            path: config.docs_resolved.file.clone(),
            source,
        })?;

    summarize(&report, output)
}

/// Print every embedded command without invoking the renderer.
fn list_commands(
    config: &Config,
    pattern: &ScanPattern,
    output: &Output,
) -> Result<(), CliError> {
    let doc_error = |source| CliError::Document {
        path: config.docs_resolved.file.clone(),
        source,
    };
    let file = File::open(&config.docs_resolved.file).map_err(doc_error)?;

    let mut total = 0usize;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(doc_error)?;
        for command in pattern.commands(&line) {
            total += 1;
            output.info(&format!(
                "{}.svg <- --single {}",
                command.filename, command.options
            ));
        }
    }

    output.success(&format!("Found {total} embedded example(s)"));
    Ok(())
}

/// Report per-invocation results and the final tally.
fn summarize(report: &RunReport, output: &Output) -> Result<(), CliError> {
    for outcome in &report.outcomes {
        if outcome.success() {
            output.info(&format!("Rendered {}", outcome.path.display()));
        } else {
            let stderr = String::from_utf8_lossy(&outcome.stderr);
            output.warning(&format!(
                "Renderer failed ({}) for {}: {}",
                outcome.status,
                outcome.command.filename,
                stderr.trim()
            ));
        }
    }
    for failure in &report.failures {
        output.warning(&format!(
            "{}: {}",
            failure.command.filename, failure.error
        ));
    }

    if report.total() == 0 {
        output.info("No embedded examples found");
        return Ok(());
    }

    let failed = report.failed();
    if failed > 0 {
        return Err(CliError::Failures(failed, report.total()));
    }

    output.success(&format!("Regenerated {} example(s)", report.total()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::Cli;

    #[test]
    fn test_zero_argument_invocation() {
        let cli = Cli::parse_from(["regen"]);

        assert_eq!(cli.config, None);
        assert_eq!(cli.docs, None);
        assert_eq!(cli.renderer, None);
        assert_eq!(cli.tool, None);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::parse_from([
            "regen",
            "--docs",
            "GUIDE.md",
            "--tool",
            "tiler",
            "--dry-run",
        ]);

        assert_eq!(cli.docs, Some("GUIDE.md".into()));
        assert_eq!(cli.tool, Some("tiler".to_owned()));
        assert!(cli.dry_run);
    }
}

