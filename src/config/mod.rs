//! Configuration for `respimg.toml`.
//!
//! The file is optional. Without it every value keeps its default, which
//! reproduces the stock pipeline: ImageMagick `convert`, changes from
//! `origin/main`, `fullsize` → `generated`, breakpoints 768/1366/1920.
//!
//! # Sections
//!
//! | Section         | Purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `[converter]`   | External image program                           |
//! | `[source]`      | Ref for the change set, path filter mode         |
//! | `[layout]`      | Source and generated directory names             |
//! | `[compress]`    | Re-encoding settings for originals               |
//! | `[variants]`    | Responsive breakpoints, axis and format          |
//! | `[placeholder]` | Low-resolution preview settings                  |

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{
    Axis, CompressConfig, ConverterConfig, FilterMode, LayoutConfig, PlaceholderConfig,
    SourceConfig, VariantsConfig,
};

use crate::{cli::Cli, debug, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "respimg.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing respimg.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Config file the values came from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Print the plan without converting (internal use only)
    #[serde(skip)]
    pub dry_run: bool,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub compress: CompressConfig,

    #[serde(default)]
    pub variants: VariantsConfig,

    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

impl Config {
    /// Load configuration for a CLI invocation.
    ///
    /// An explicit `--config` must exist. Otherwise `respimg.toml` is searched
    /// upward from the working directory and defaults apply when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => Some(path.clone()),
            None => find_config_file(&cwd, Path::new(CONFIG_FILE)),
        };

        let mut config = match &config_path {
            Some(path) => {
                debug!("config"; "loading {}", path.display());
                Self::from_path(path)?
            }
            None => {
                debug!("config"; "no {CONFIG_FILE} found, using defaults");
                Self::default()
            }
        };

        config.config_path = config_path;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, _) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// CLI flags override file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(reference) = &cli.reference {
            self.source.remote_ref.clone_from(reference);
        }
        if let Some(program) = &cli.program {
            self.converter.program.clone_from(program);
        }
        if let Some(filter) = cli.filter {
            self.source.filter = filter;
        }
        self.dry_run = cli.dry_run;
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.converter.validate(&mut diag);
        self.source.validate(&mut diag);
        self.layout.validate(&mut diag);
        self.compress.validate(&mut diag);
        self.variants.validate(&mut diag);
        self.placeholder.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// tests
// ============================================================================
