//! Error types for the fsl-editor crate
//!
//! Provides the `EditorError` enum that wraps `CoreError` from fsl-core and
//! adds the failure cases of document sessions and extensions.

use core::fmt;
use fsl_core::CoreError;
use thiserror::Error;

/// Main error type for fsl-editor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Errors from fsl-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Document not open in the session
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Document opened twice under the same id
    #[error("Document already open: {id}")]
    DocumentAlreadyOpen { id: String },

    /// Extension failed or was used in the wrong state
    #[error("Extension error: {extension}: {message}")]
    ExtensionError { extension: String, message: String },

    /// Command execution failed
    #[error("Command execution failed: {message}")]
    CommandFailed { message: String },

    /// Too many open documents
    #[error("Session limit exceeded: {current}/{limit} documents")]
    SessionLimitExceeded { current: usize, limit: usize },
}

impl EditorError {
    /// Create a new document not found error
    pub fn document_not_found<T: fmt::Display>(id: T) -> Self {
        Self::DocumentNotFound { id: id.to_string() }
    }

    /// Create a new command failed error
    pub fn command_failed<T: fmt::Display>(message: T) -> Self {
        Self::CommandFailed {
            message: message.to_string(),
        }
    }

    /// Create a new extension error
    pub fn extension<E: fmt::Display, T: fmt::Display>(extension: E, message: T) -> Self {
        Self::ExtensionError {
            extension: extension.to_string(),
            message: message.to_string(),
        }
    }

    /// Check if error is recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(core_err) => core_err.is_recoverable(),
            Self::DocumentNotFound { .. }
            | Self::DocumentAlreadyOpen { .. }
            | Self::ExtensionError { .. }
            | Self::CommandFailed { .. } => true,
            Self::SessionLimitExceeded { .. } => false,
        }
    }

    /// Get the underlying core error if this wraps one
    #[must_use]
    pub const fn as_core_error(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core_err) => Some(core_err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;
