//! Open source document tracked by the editor
//!
//! Holds the full text of one document together with its identity and a
//! version counter bumped on every change. Line access follows the tokenizer's
//! line model, so `\r\n` and `\n` both end a line.

use fsl_core::LineIndex;

/// A document open in the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    id: String,
    text: String,
    version: u64,
}

impl EditorDocument {
    /// Create a document at version 0
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            version: 0,
        }
    }

    /// Document identity, usually its path
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of changes applied since the document was opened
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole text and bump the version
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.version += 1;
    }

    /// Length of the text in bytes
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    /// Check if the document has no text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of physical lines, at least one
    #[must_use]
    pub fn line_count(&self) -> usize {
        LineIndex::new(&self.text).line_count()
    }

    /// Content of a line without its terminator
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        LineIndex::new(&self.text).line(line)
    }
}
