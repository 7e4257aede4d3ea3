//! Structured error types shared across the loom runner crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LoomError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, exit codes, command lines).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the operator resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LoomError {
    /// A required input artifact was absent before dispatch.
    #[error("missing input artifact: {0}")]
    MissingInputArtifact(ErrorInfo),
    /// The engine exited with a non-zero status.
    #[error("external process failure: {0}")]
    ExternalProcessFailure(ErrorInfo),
    /// The engine exited cleanly but a declared output is absent.
    #[error("missing output artifact: {0}")]
    MissingOutputArtifact(ErrorInfo),
    /// Build variant, executable, parameter or directory problems.
    #[error("configuration error: {0}")]
    Configuration(ErrorInfo),
    /// Dataset catalog and fixture problems.
    #[error("dataset error: {0}")]
    Dataset(ErrorInfo),
    /// Serialization and parse errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl LoomError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LoomError::MissingInputArtifact(info)
            | LoomError::ExternalProcessFailure(info)
            | LoomError::MissingOutputArtifact(info)
            | LoomError::Configuration(info)
            | LoomError::Dataset(info)
            | LoomError::Serde(info) => info,
        }
    }

    /// Precondition failure for an input that does not exist.
    pub fn missing_input(path: &Path) -> Self {
        LoomError::MissingInputArtifact(
            ErrorInfo::new("loom.missing_input", "input artifact not found")
                .with_context("path", path.display().to_string()),
        )
    }

    /// Postcondition failure for an output the engine did not produce.
    pub fn missing_output(path: &Path) -> Self {
        LoomError::MissingOutputArtifact(
            ErrorInfo::new(
                "loom.missing_output",
                "engine exited successfully but did not produce an output artifact",
            )
            .with_context("path", path.display().to_string()),
        )
    }

    /// Non-zero exit of the engine. `code` is `None` when the process was
    /// terminated by a signal.
    pub fn process_failed(code: Option<i32>, command: impl Into<String>) -> Self {
        let exit = code.map_or_else(|| "signal".to_string(), |code| code.to_string());
        LoomError::ExternalProcessFailure(
            ErrorInfo::new("loom.process_failed", "engine exited with a failure status")
                .with_context("exit_code", exit)
                .with_context("command", command),
        )
    }

    /// Shorthand for a configuration failure with a stable code.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        LoomError::Configuration(ErrorInfo::new(code, message))
    }

    /// Path recorded in the error context, if any.
    pub fn path(&self) -> Option<&str> {
        self.info().context.get("path").map(String::as_str)
    }

    /// Exit code of a failed engine process. `None` for other families and for
    /// processes terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LoomError::ExternalProcessFailure(info) => info
                .context
                .get("exit_code")
                .and_then(|value| value.parse().ok()),
            _ => None,
        }
    }

    /// Rendered command line of a failed engine process.
    pub fn command(&self) -> Option<&str> {
        match self {
            LoomError::ExternalProcessFailure(info) => {
                info.context.get("command").map(String::as_str)
            }
            _ => None,
        }
    }
}
