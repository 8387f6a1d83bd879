//! Error types for the cloneseek-rs library.
//!
//! The detection pipeline itself is infallible: a shape mismatch or an empty
//! dependency set is a normal outcome, not an error. Errors surface only from
//! the PDG builder (malformed graph wiring) and from configuration
//! validation.

use thiserror::Error;

/// Main result type for cloneseek operations.
pub type Result<T> = std::result::Result<T, CloneSeekError>;

/// Error type for PDG construction and configuration handling.
#[derive(Error, Debug)]
pub enum CloneSeekError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Graph construction errors
    #[error("Graph error: {message}")]
    Graph {
        /// Error description
        message: String,
        /// Graph node or edge that caused the error
        element: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
    },
}

impl CloneSeekError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new graph construction error
    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
            element: None,
        }
    }

    /// Create a new graph construction error naming the offending element
    pub fn graph_element(message: impl Into<String>, element: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
            element: Some(element.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CloneSeekError::config("Invalid configuration");
        assert!(matches!(err, CloneSeekError::Config { .. }));

        let err = CloneSeekError::graph_element("node id out of range", "17");
        assert!(matches!(
            err,
            CloneSeekError::Graph {
                element: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_error_display() {
        let err = CloneSeekError::validation("statement kinds must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: statement kinds must not be empty"
        );
    }
}
