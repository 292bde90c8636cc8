//! Generator error types
//!
//! Two kinds only: caller mistakes and unexpected failures.

use std::fmt;

/// Errors produced while generating or formatting a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The caller supplied an argument the generator cannot honour.
    InvalidArgument(String),
    /// Something failed that the caller could not have prevented.
    Internal(String),
}

impl GeneratorError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the error was caused by the request rather than the server
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Message text without the classification prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(msg) | Self::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for GeneratorError {}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("Failed to serialize response: {e}"))
    }
}

impl From<hyper::http::Error> for GeneratorError {
    fn from(e: hyper::http::Error) -> Self {
        Self::Internal(format!("Failed to build response: {e}"))
    }
}
