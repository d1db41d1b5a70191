//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or validating `content-url.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid TOML in config file")]
    Toml(#[from] toml::de::Error),

    #[error("Config file `{0}` not found")]
    NotFound(PathBuf),

    // no #[from]: a source() would print every diagnostic twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// A validation problem in one config field, with a fix hint.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: String,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        write!(f, "\n    {} {}", "hint:".yellow(), self.hint)
    }
}

/// Every problem found by one validation pass.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: hint.into(),
        });
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Err(self)` if anything was reported.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "{} ({count} {noun})", "invalid config".red().bold())?;
        for err in &self.errors {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
