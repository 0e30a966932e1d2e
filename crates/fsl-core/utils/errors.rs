//! Error type for FSL core operations
//!
//! Tokenizing text never fails; errors only come from loading configuration
//! and compiling identifier sets into patterns.
//!
//! # Examples
//!
//! ```rust
//! use fsl_core::utils::errors::CoreError;
//!
//! let err = CoreError::unknown_category("bracket9");
//! assert!(err.is_recoverable());
//! assert_eq!(err.to_string(), "Unknown token category: bracket9");
//! ```

use core::fmt;
use thiserror::Error;

/// Main error type for FSL core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed JSON configuration
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(String),

    /// A category name that is not part of the legend
    #[error("Unknown token category: {0}")]
    UnknownCategory(String),

    /// A color string that is not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Identifier sets that could not be compiled into a pattern
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl CoreError {
    /// Create configuration error from message
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::Config(message.to_string())
    }

    /// Create unknown category error
    pub fn unknown_category<T: fmt::Display>(name: T) -> Self {
        Self::UnknownCategory(name.to_string())
    }

    /// Create color error from the rejected input
    pub fn invalid_color<T: fmt::Display>(color: T) -> Self {
        Self::InvalidColor(color.to_string())
    }

    /// Create pattern compilation error
    pub fn invalid_pattern<T: fmt::Display>(message: T) -> Self {
        Self::InvalidPattern(message.to_string())
    }

    /// Check if error is recoverable by correcting a setting
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidPattern(_))
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        assert_eq!(
            CoreError::config("empty keyword").to_string(),
            "Configuration error: empty keyword"
        );
        assert_eq!(
            CoreError::invalid_color("#12").to_string(),
            "Invalid color: #12"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(ref msg) if msg.contains("missing.json")));
        assert!(err.is_recoverable());
    }

    #[test]
    fn pattern_errors_are_not_recoverable() {
        assert!(!CoreError::invalid_pattern("too big").is_recoverable());
    }
}
