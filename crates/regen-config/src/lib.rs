//! Configuration management for regen.
//!
//! Parses `regen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support `${VAR}` environment variable
//! expansion. Expanded fields:
//! - `docs.file`
//! - `renderer.program`
//!
//! ## Defaults
//!
//! With no config file present, the defaults scan `README.md` and invoke the
//! renderer as `cargo run --release --`, writing artifacts under `img/`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the scanned document.
    pub docs_file: Option<PathBuf>,
    /// Override the artifact output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the renderer program.
    pub renderer_program: Option<String>,
    /// Override the tool name inside embedded links.
    pub tool_name: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "regen.toml";

/// Default document to scan.
const DEFAULT_DOC_FILE: &str = "README.md";

/// Default artifact directory.
const DEFAULT_OUTPUT_DIR: &str = "img";

/// Default tool name inside embedded links.
const DEFAULT_TOOL_NAME: &str = "dcc_tiler_cli";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document configuration (paths are relative strings from TOML).
    docs: DocsRaw,
    /// Renderer invocation configuration.
    renderer: RendererRaw,
    /// Artifact output configuration.
    output: OutputRaw,

    /// Resolved document configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved renderer configuration (set after loading).
    #[serde(skip)]
    pub renderer_resolved: RendererConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw document configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsRaw {
    file: Option<String>,
}

/// Raw renderer configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RendererRaw {
    name: Option<String>,
    program: Option<String>,
    args: Option<Vec<String>>,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputRaw {
    dir: Option<String>,
}

/// Resolved document configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Document scanned for embedded command links.
    pub file: PathBuf,
}

/// Resolved renderer configuration.
#[derive(Debug)]
pub struct RendererConfig {
    /// Tool name appearing inside embedded links.
    pub name: String,
    /// Program to invoke.
    pub program: String,
    /// Arguments preceding the per-example options.
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOOL_NAME.to_owned(),
            program: "cargo".to_owned(),
            args: vec!["run".to_owned(), "--release".to_owned(), "--".to_owned()],
        }
    }
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory rendered artifacts are written to.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.file`").
        field: String,
        /// Error message (e.g., "${`DOC_FILE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Join a possibly relative path onto a base directory.
fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `regen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing
    /// fails, or a value fails expansion or validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load and resolve configuration from a specific file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error on unreadable file, invalid TOML, or failed expansion.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.resolve(&base)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_file) = &settings.docs_file {
            self.docs_resolved.file.clone_from(docs_file);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(output_dir);
        }
        if let Some(program) = &settings.renderer_program {
            self.renderer_resolved.program.clone_from(program);
        }
        if let Some(tool_name) = &settings.tool_name {
            self.renderer_resolved.name.clone_from(tool_name);
        }
    }

    /// Validate resolved values.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.renderer_resolved.name, "renderer.name")?;
        require_non_empty(&self.renderer_resolved.program, "renderer.program")?;
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsRaw::default(),
            renderer: RendererRaw::default(),
            output: OutputRaw::default(),
            docs_resolved: DocsConfig {
                file: base.join(DEFAULT_DOC_FILE),
            },
            renderer_resolved: RendererConfig::default(),
            output_resolved: OutputConfig {
                dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            config_path: None,
        }
    }

    /// Resolve raw values into the `*_resolved` fields.
    fn resolve(&mut self, base: &Path) -> Result<(), ConfigError> {
        let file = match &self.docs.file {
            Some(raw) => expand::env_str(raw, "docs.file")?,
            None => DEFAULT_DOC_FILE.to_owned(),
        };
        self.docs_resolved = DocsConfig {
            file: resolve_path(base, &file),
        };

        let defaults = RendererConfig::default();
        let program = match &self.renderer.program {
            Some(raw) => expand::env_str(raw, "renderer.program")?,
            None => defaults.program,
        };
        self.renderer_resolved = RendererConfig {
            name: self.renderer.name.clone().unwrap_or(defaults.name),
            program,
            args: self.renderer.args.clone().unwrap_or(defaults.args),
        };

        let dir = self.output.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
        self.output_resolved = OutputConfig {
            dir: resolve_path(base, dir),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default_with_base(Path::new("/project"));

        assert_eq!(config.docs_resolved.file, Path::new("/project/README.md"));
        assert_eq!(config.output_resolved.dir, Path::new("/project/img"));
        assert_eq!(config.renderer_resolved.name, "dcc_tiler_cli");
        assert_eq!(config.renderer_resolved.program, "cargo");
        assert_eq!(config.renderer_resolved.args, ["run", "--release", "--"]);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[docs]
file = "docs/GUIDE.md"

[renderer]
name = "tiler"
program = "tiler-render"
args = ["--quiet"]

[output]
dir = "generated"
"#,
        );

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.docs_resolved.file, dir.path().join("docs/GUIDE.md"));
        assert_eq!(config.output_resolved.dir, dir.path().join("generated"));
        assert_eq!(config.renderer_resolved.name, "tiler");
        assert_eq!(config.renderer_resolved.program, "tiler-render");
        assert_eq!(config.renderer_resolved.args, ["--quiet"]);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[docs]\nfile = \"MANUAL.md\"\n");

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.docs_resolved.file, dir.path().join("MANUAL.md"));
        assert_eq!(config.renderer_resolved.program, "cargo");
        assert_eq!(config.output_resolved.dir, dir.path().join("img"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[output]\ndir = \"/var/www/img\"\n");

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.output_resolved.dir, Path::new("/var/www/img"));
    }

    #[test]
    fn test_cli_settings_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[docs]\nfile = \"MANUAL.md\"\n");

        let settings = CliSettings {
            docs_file: Some(PathBuf::from("/elsewhere/README.md")),
            renderer_program: Some("mock-renderer".to_owned()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(
            config.docs_resolved.file,
            Path::new("/elsewhere/README.md")
        );
        assert_eq!(config.renderer_resolved.program, "mock-renderer");
        // Untouched values keep the file/defaults.
        assert_eq!(config.output_resolved.dir, dir.path().join("img"));
    }

    #[test]
    fn test_explicit_missing_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = Config::load(Some(&missing), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[docs\nfile = ");

        let err = Config::load_from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_renderer_name_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[renderer]\nname = \"\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        match err {
            ConfigError::Validation(message) => {
                assert!(message.contains("renderer.name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_env_expansion_in_docs_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[docs]\nfile = \"${REGEN_CONFIG_TEST_DOC}\"\n");
        // SAFETY: single-threaded access to a test-unique variable.
        unsafe { std::env::set_var("REGEN_CONFIG_TEST_DOC", "EXPANDED.md") };

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.docs_resolved.file, dir.path().join("EXPANDED.md"));
    }

    #[test]
    fn test_unset_env_variable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[renderer]\nprogram = \"${REGEN_CONFIG_TEST_UNSET}\"\n",
        );

        let err = Config::load_from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { field, .. } if field == "renderer.program"));
    }
}
