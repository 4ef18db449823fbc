// SPDX-License-Identifier: MIT

//! Typed error handling for dialog-matcher
//!
//! Each concern gets its own thiserror enum; `MatcherError` aggregates them
//! for callers (loader, CLI) that cross concerns.

use thiserror::Error;

/// Top-level error type for dialog-matcher
#[derive(Debug, Error)]
pub enum MatcherError {
    /// Condition configuration or evaluation errors
    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    /// Conversation memory store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Expression decoding errors outside of a condition
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Invalid entry in a condition definition file
    #[error("Condition '{name}': {source}")]
    Condition {
        name: String,
        #[source]
        source: BehaviorError,
    },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Decode error raised by an expression parser
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Could not parse expressions at position {position}: {message}")]
pub struct ParseError {
    /// Byte offset into the input where decoding failed
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Errors raised by behavior extensions
#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Invalid configuration, raised when the extension is built
    #[error("InputMatcher config param: {param}. {message}")]
    Config { param: String, message: String },

    /// A configured or stored expression string could not be decoded
    #[error("Failed to decode expressions: {0}")]
    Decode(#[from] ParseError),
}

impl BehaviorError {
    /// Create a config error for the given parameter
    pub fn config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Conversation memory store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No snapshot stored for the conversation
    #[error("Conversation memory not found: {0}")]
    NotFound(String),

    /// Conversation id cannot be used as a storage key
    #[error("Invalid conversation id: '{0}'")]
    InvalidId(String),

    /// I/O errors from file-backed stores
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = BehaviorError::config("expressions", "Needs to be set");
        assert_eq!(
            err.to_string(),
            "InputMatcher config param: expressions. Needs to be set"
        );
    }

    #[test]
    fn test_decode_error_wraps_parse_error() {
        let err: BehaviorError = ParseError::new(3, "unexpected ')'").into();
        assert_eq!(
            err.to_string(),
            "Failed to decode expressions: Could not parse expressions at position 3: unexpected ')'"
        );
    }

    #[test]
    fn test_matcher_error_from_store() {
        let err: MatcherError = StoreError::NotFound("abc".to_string()).into();
        assert_eq!(err.to_string(), "Conversation memory not found: abc");
    }
}
