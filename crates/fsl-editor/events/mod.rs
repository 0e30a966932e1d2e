//! Document lifecycle events
//!
//! Every open, change and close of a document in a session is described by a
//! `DocumentEvent` and broadcast to the loaded extensions, which use them to
//! keep per-document state such as the token cache current. Replacing the
//! identifier lists is announced once, then every open document is reclassified.

/// Events that can occur for an open document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A document was opened
    Opened {
        /// Identity of the document
        document_id: String,
        /// Size of the document in bytes
        size: usize,
    },

    /// A document's text was replaced
    Changed {
        /// Identity of the document
        document_id: String,
        /// Version after the change
        version: u64,
    },

    /// A document was closed
    Closed {
        /// Identity of the document
        document_id: String,
    },

    /// An open document must be classified again with unchanged text
    Reclassify {
        /// Identity of the document
        document_id: String,
    },

    /// The keyword, type, function and semantic lists were replaced
    LanguageChanged,

    /// Configuration setting changed
    ConfigChanged {
        /// Name of the configuration key
        key: String,
        /// Old value (if any)
        old_value: Option<String>,
        /// New value
        new_value: String,
    },
}

impl DocumentEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Self::Opened { document_id, size } => {
                format!("Opened document '{document_id}' ({size} bytes)")
            }
            Self::Changed {
                document_id,
                version,
            } => format!("Changed document '{document_id}' (version {version})"),
            Self::Closed { document_id } => format!("Closed document '{document_id}'"),
            Self::Reclassify { document_id } => format!("Reclassify document '{document_id}'"),
            Self::LanguageChanged => "Language configuration changed".to_string(),
            Self::ConfigChanged { key, .. } => format!("Configuration '{key}' changed"),
        }
    }

    /// Document the event refers to, if any
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::Opened { document_id, .. }
            | Self::Changed { document_id, .. }
            | Self::Closed { document_id }
            | Self::Reclassify { document_id } => Some(document_id),
            Self::LanguageChanged | Self::ConfigChanged { .. } => None,
        }
    }

    /// Check if this event asks for the document's text to be scanned
    #[must_use]
    pub const fn affects_text(&self) -> bool {
        matches!(
            self,
            Self::Opened { .. } | Self::Changed { .. } | Self::Reclassify { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_events_carry_document_id() {
        let opened = DocumentEvent::Opened {
            document_id: "a.fsl".to_string(),
            size: 12,
        };
        let closed = DocumentEvent::Closed {
            document_id: "a.fsl".to_string(),
        };

        assert_eq!(opened.document_id(), Some("a.fsl"));
        assert!(opened.affects_text());
        assert!(!closed.affects_text());
        assert_eq!(opened.description(), "Opened document 'a.fsl' (12 bytes)");
        assert_eq!(closed.description(), "Closed document 'a.fsl'");
    }

    #[test]
    fn language_change_rescans_without_text_change() {
        let event = DocumentEvent::Reclassify {
            document_id: "a.fsl".to_string(),
        };
        assert_eq!(event.document_id(), Some("a.fsl"));
        assert!(event.affects_text());
        assert_eq!(event.description(), "Reclassify document 'a.fsl'");

        assert_eq!(DocumentEvent::LanguageChanged.document_id(), None);
        assert!(!DocumentEvent::LanguageChanged.affects_text());
    }

    #[test]
    fn config_events_have_no_document() {
        let event = DocumentEvent::ConfigChanged {
            key: "complete.max_suggestions".to_string(),
            old_value: None,
            new_value: "5".to_string(),
        };
        assert_eq!(event.document_id(), None);
        assert_eq!(
            event.description(),
            "Configuration 'complete.max_suggestions' changed"
        );
    }
}
