//! Error surface of the Ising crates.
//!
//! Every failure carries an [`ErrorInfo`]: a stable code for programmatic
//! matching, a message, optional key/value context and an optional hint. The
//! enum variant names the subsystem that failed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message, context and hint describing one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier, e.g. `invalid-bias`.
    pub code: String,
    /// Diagnostic for humans.
    pub message: String,
    /// Offending values and paths, keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records an offending value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a suggested remedy.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Errors raised while building lattices, validating configuration or writing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum IsingError {
    /// Invalid lattice size or initial-condition bias.
    #[error("lattice error: {0}")]
    Lattice(ErrorInfo),
    /// Run, sweep or temperature settings that cannot be simulated.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Result tables, time series, frame dumps and manifests.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// YAML and JSON (de)serialization.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl IsingError {
    /// Payload of any variant.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            Self::Lattice(info) | Self::Config(info) | Self::Io(info) | Self::Serde(info) => info,
        }
    }

    /// Shorthand for `self.info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Wraps a filesystem failure on `path`.
    pub fn io(code: &str, err: std::io::Error, path: impl fmt::Display) -> Self {
        Self::Io(
            ErrorInfo::new(code, err.to_string())
                .with_context("path", path.to_string())
                .with_context("kind", format!("{:?}", err.kind())),
        )
    }
}
