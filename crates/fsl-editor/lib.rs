//! Editor integration layer for FluffSL sources
//!
//! `fsl-editor` wires the `fsl-core` tokenizer into an editor: documents are
//! opened, changed and closed through an [`EditorSessionManager`], built-in
//! extensions react to those lifecycle events, and a shared [`TokenCache`]
//! remembers which identifiers each document uses so completion can suggest
//! them.
//!
//! # Example
//!
//! ```
//! use fsl_editor::{EditorSessionManager, LanguageConfig, SessionConfig};
//!
//! let config = LanguageConfig::new().with_keywords(["return"]);
//! let mut sessions = EditorSessionManager::new(SessionConfig::default(), config)?;
//!
//! sessions.open_document("main.fsl", "return (x); // done")?;
//! let completions = sessions.completions("main.fsl")?;
//! assert_eq!(completions[0].label, "return");
//!
//! sessions.close_document("main.fsl")?;
//! assert!(sessions.token_cache().get("main.fsl").is_none());
//! # Ok::<(), fsl_editor::EditorError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod core;
pub mod events;
pub mod extensions;
pub mod sessions;

// Re-export core types used throughout the editor API
pub use fsl_core::{LanguageConfig, SemanticTokenizer, Span, TokenCategory, TokenLegend};

pub use crate::core::{EditorDocument, EditorError, Result};
pub use events::DocumentEvent;
pub use extensions::builtin::{
    AutoCompleteExtension, CompletionItem, CompletionKind, SemanticTokensExtension,
};
pub use extensions::{
    EditorContext, EditorExtension, ExtensionCapability, ExtensionCommand, ExtensionContext,
    ExtensionInfo, ExtensionManager, ExtensionResult, ExtensionState, MessageHandler,
    MessageLevel, RecordingMessageHandler, TracingMessageHandler,
};
pub use sessions::{CachedTokens, EditorSessionManager, SessionConfig, SessionStats, TokenCache};
