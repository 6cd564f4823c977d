//! Configuration error types.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    // NOTE: No #[from] here - we don't want source() which causes duplicate output
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

// ============================================================================
// ConfigDiagnostic
// ============================================================================

/// A single configuration diagnostic
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Config field path (e.g., "variants.breakpoints")
    pub field: &'static str,
    /// Error description
    pub message: String,
    /// Fix hint (optional)
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}{}", "[".dimmed(), self.field.cyan(), "]".dimmed())?;
        write!(f, "{} {}", "→".red(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

// ============================================================================
// ConfigDiagnostics
// ============================================================================

/// Validation errors collected across all sections before reporting.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic::new(field, message));
    }

    /// Add an error with a hint.
    pub fn error_with_hint(
        &mut self,
        field: &'static str,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors
            .push(ConfigDiagnostic::new(field, message).with_hint(hint));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// Convert to Result (returns Err if there are errors).
    pub fn into_result(self) -> Result<(), Self> {
        if !self.has_errors() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", "config validation failed:".red().bold())?;
        for (i, err) in self.errors.iter().enumerate() {
            write!(f, "{err}")?;
            if i + 1 < self.errors.len() {
                writeln!(f, "\n")?;
            }
        }
        if self.errors.len() > 1 {
            write!(
                f,
                "\n\n{} {} {}",
                "found".dimmed(),
                self.errors.len().to_string().red().bold(),
                "errors".dimmed()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("respimg.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("respimg.toml"));
    }

    #[test]
    fn test_diagnostics_display_lists_fields() {
        let mut diag = ConfigDiagnostics::new();
        diag.error("variants.breakpoints", "at least one breakpoint is required");
        diag.error_with_hint("converter.program", "program is empty", "set it");
        assert_eq!(diag.errors().len(), 2);

        let display = format!("{diag}");
        assert!(display.contains("variants.breakpoints"));
        assert!(display.contains("program is empty"));
        assert!(display.contains("set it"));
    }

    #[test]
    fn test_into_result() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());
        let mut diag = ConfigDiagnostics::new();
        diag.error("layout.source_dir", "bad");
        assert!(diag.into_result().is_err());
    }
}
