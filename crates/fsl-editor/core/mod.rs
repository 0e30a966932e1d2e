//! Core types for the editor layer
//!
//! - `EditorDocument`: an open source text with its identity and version
//! - `EditorError`: errors from document, session and extension operations

pub mod document;
pub mod errors;

pub use document::EditorDocument;
pub use errors::{EditorError, Result};
