//! Structured error types shared across scatter crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ScatterError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (probabilities, volumes, type names, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the scatter engine.
///
/// Ordinary rejections are never errors. Only the two fatal families
/// (`Probability`, `Config`) abort a timestep; the remaining families cover
/// malformed inputs handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ScatterError {
    /// An acceptance probability exceeded one; the timestep is too coarse.
    #[error("probability error: {0}")]
    Probability(ErrorInfo),
    /// Invalid or unsupported run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Particle-type or decay-mode registry errors.
    #[error("registry error: {0}")]
    Registry(ErrorInfo),
    /// Serialization and input format errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
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

impl ScatterError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ScatterError::Probability(info)
            | ScatterError::Config(info)
            | ScatterError::Registry(info)
            | ScatterError::Serde(info) => info,
        }
    }

    /// Whether the error must terminate the enclosing timestep.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScatterError::Probability(_) | ScatterError::Config(_))
    }
}
