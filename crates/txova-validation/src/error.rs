//! Error types for the Txova validation library
//!
//! Rule violations are data ([`crate::ValidationErrors`]) and never appear here.
//! This enum covers operational failures: malformed rule expressions,
//! registry misuse and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for library operations
#[derive(Error, Debug)]
pub enum Error {
    /// A rule expression could not be parsed
    #[error("Invalid rule expression '{expression}': {reason}")]
    RuleExpression { expression: String, reason: String },

    /// A rule expression names a rule the engine does not know
    #[error("Unknown validation rule '{rule}'")]
    UnknownRule { rule: String },

    /// A custom rule name contains characters that cannot appear in an expression
    #[error("Invalid rule name '{name}': use ASCII letters, digits and underscores")]
    InvalidRuleName { name: String },

    /// A custom rule collides with an existing one
    #[error("Validation rule '{name}' is already registered")]
    RuleAlreadyRegistered { name: String },

    /// The process-wide registry has been initialised and no longer accepts rules
    #[error("Cannot register rule '{name}': the validator registry is already in use")]
    RegistryFrozen { name: String },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors while reading configuration
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a rule expression error
    pub fn rule_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RuleExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;
