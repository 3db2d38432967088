//! Error types for the logging facade

use super::field::FieldMap;

pub type Result<T, E = LogError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A level name that does not match the enumerated set
    #[error("invalid log level: '{0}'")]
    InvalidLevel(String),

    /// A foreign numeric severity with no mapping to a level
    #[error("unmapped foreign severity: {0}")]
    UnknownSeverity(u32),

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Template / positional argument count mismatch
    #[error("template '{template}' expects {expected} positional arguments, got {given}")]
    TemplateArity {
        template: String,
        expected: usize,
        given: usize,
    },

    /// Malformed placeholder syntax in a message template
    #[error("malformed template '{template}': {message}")]
    Template { template: String, message: String },

    /// Unbinding a key that is not bound
    #[error("key '{0}' is not bound")]
    KeyNotBound(String),

    /// Returned by `fatal` after the line has been emitted; carries the
    /// rendered message and the merged fields for inspection
    #[error("fatal: {message}")]
    Fatal { message: String, fields: FieldMap },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LogError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a malformed template error
    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// True for errors raised at the point of misconfiguration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LogError::InvalidLevel(_)
                | LogError::UnknownSeverity(_)
                | LogError::InvalidConfiguration { .. }
        )
    }
}
