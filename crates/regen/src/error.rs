//! CLI error types.

use std::path::PathBuf;

use regen_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} of {1} invocation(s) failed")]
    Failures(usize, usize),
}
