//! Structured error types shared across the pseudoflow crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FlowError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (line numbers, node ids, sizes).
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

/// Canonical error type for network construction and the outer run layers.
///
/// The solver core itself has no error paths: every variant is raised while
/// building or loading a network, or while reading and writing artefacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FlowError {
    /// Problem description does not follow the expected format.
    #[error("malformed description: {0}")]
    MalformedDescription(ErrorInfo),
    /// A node id outside `1..=num_nodes` was referenced.
    #[error("unknown node reference: {0}")]
    UnknownNodeReference(ErrorInfo),
    /// The source or the sink was never declared.
    #[error("missing terminal: {0}")]
    MissingTerminal(ErrorInfo),
    /// An arc was declared with a negative capacity.
    #[error("negative capacity: {0}")]
    NegativeCapacity(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// File system errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
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

impl FlowError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FlowError::MalformedDescription(info)
            | FlowError::UnknownNodeReference(info)
            | FlowError::MissingTerminal(info)
            | FlowError::NegativeCapacity(info)
            | FlowError::Serde(info)
            | FlowError::Io(info) => info,
        }
    }

    /// Returns the error with an additional context entry.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            FlowError::MalformedDescription(info) => {
                FlowError::MalformedDescription(info.with_context(key, value))
            }
            FlowError::UnknownNodeReference(info) => {
                FlowError::UnknownNodeReference(info.with_context(key, value))
            }
            FlowError::MissingTerminal(info) => {
                FlowError::MissingTerminal(info.with_context(key, value))
            }
            FlowError::NegativeCapacity(info) => {
                FlowError::NegativeCapacity(info.with_context(key, value))
            }
            FlowError::Serde(info) => FlowError::Serde(info.with_context(key, value)),
            FlowError::Io(info) => FlowError::Io(info.with_context(key, value)),
        }
    }

    /// Returns the stable code of the underlying payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::Io(ErrorInfo::new("io", err.to_string()))
    }
}
