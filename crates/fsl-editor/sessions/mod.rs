//! Session management for multi-document editing
//!
//! Provides the `EditorSessionManager`, which owns the open documents, the
//! language configuration, the shared token cache and the extension manager.
//! Every open, change and close is turned into a [`DocumentEvent`] and
//! dispatched to the loaded extensions with the affected document as context.

pub mod token_cache;

pub use token_cache::{CachedTokens, TokenCache};

use crate::core::{EditorDocument, EditorError, Result};
use crate::events::DocumentEvent;
use crate::extensions::builtin::auto_complete::{collect_completions, AutoCompleteConfig};
use crate::extensions::builtin::semantic_tokens::{encode_spans, SemanticTokensConfig};
use crate::extensions::builtin::{load_builtin_extensions, CompletionItem};
use crate::extensions::{
    EditorContext, ExtensionManager, ExtensionResult, MessageHandler, TracingMessageHandler,
};
use ahash::RandomState;
use fsl_core::utils::create_hash_map;
use fsl_core::{LanguageConfig, SemanticTokenizer, TokenLegend};
use std::collections::HashMap;
use tracing::debug;

/// Configuration for session management
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of concurrently open documents
    pub max_documents: usize,

    /// Initial extension settings, such as `complete.max_suggestions`
    pub settings: HashMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_documents: 50,
            settings: HashMap::new(),
        }
    }
}

impl SessionConfig {
    /// Set the document limit
    #[must_use]
    pub const fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }

    /// Add an initial extension setting
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// Statistics about session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of open documents
    pub open_documents: usize,

    /// Number of documents with a token cache entry
    pub cached_documents: usize,

    /// Number of open, update and close operations performed
    pub operations: usize,
}

/// Manager for the documents of one editor
pub struct EditorSessionManager {
    config: SessionConfig,
    language: LanguageConfig,
    documents: HashMap<String, EditorDocument, RandomState>,
    settings: HashMap<String, String>,
    cache: TokenCache,
    extensions: ExtensionManager,
    tokenizer: SemanticTokenizer,
    legend: TokenLegend,
    messages: Box<dyn MessageHandler>,
    operations: usize,
}

impl core::fmt::Debug for EditorSessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditorSessionManager")
            .field("config", &self.config)
            .field("documents", &self.document_ids())
            .field("cache", &self.cache)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl EditorSessionManager {
    /// Create a session manager with the built-in extensions loaded
    ///
    /// User messages from extensions are forwarded to `tracing`.
    ///
    /// # Errors
    ///
    /// Fails if the language configuration cannot be compiled or a built-in
    /// extension fails to initialize.
    pub fn new(config: SessionConfig, language: LanguageConfig) -> Result<Self> {
        Self::with_message_handler(config, language, Box::new(TracingMessageHandler))
    }

    /// Create a session manager delivering user messages to `messages`
    ///
    /// # Errors
    ///
    /// Fails if the language configuration cannot be compiled or a built-in
    /// extension fails to initialize.
    pub fn with_message_handler(
        config: SessionConfig,
        language: LanguageConfig,
        messages: Box<dyn MessageHandler>,
    ) -> Result<Self> {
        let tokenizer = SemanticTokenizer::new(&language)?;
        let mut extensions = ExtensionManager::new();
        load_builtin_extensions(&mut extensions)?;

        let mut manager = Self {
            settings: config.settings.clone(),
            config,
            language,
            documents: create_hash_map(),
            cache: TokenCache::new(),
            extensions,
            tokenizer,
            legend: TokenLegend::new(),
            messages,
            operations: 0,
        };

        let mut context = EditorContext::new(
            None,
            &manager.language,
            &mut manager.settings,
            &manager.cache,
            manager.messages.as_mut(),
        );
        manager.extensions.initialize_all(&mut context)?;

        Ok(manager)
    }

    /// Open a document
    ///
    /// # Errors
    ///
    /// Fails if a document with the same id is open or the document limit is
    /// reached.
    pub fn open_document(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        if self.documents.contains_key(id) {
            return Err(EditorError::DocumentAlreadyOpen { id: id.to_string() });
        }
        if self.documents.len() >= self.config.max_documents {
            return Err(EditorError::SessionLimitExceeded {
                current: self.documents.len(),
                limit: self.config.max_documents,
            });
        }

        let document = EditorDocument::new(id, text);
        let size = document.len_bytes();
        self.documents.insert(id.to_string(), document);
        debug!(document_id = id, size, "document opened");

        self.dispatch(
            Some(id),
            &DocumentEvent::Opened {
                document_id: id.to_string(),
                size,
            },
        );
        Ok(())
    }

    /// Replace the text of an open document, returning its new version
    ///
    /// # Errors
    ///
    /// Fails if the document is not open.
    pub fn update_document(&mut self, id: &str, text: impl Into<String>) -> Result<u64> {
        let document = self
            .documents
            .get_mut(id)
            .ok_or_else(|| EditorError::document_not_found(id))?;
        document.set_text(text);
        let version = document.version();
        debug!(document_id = id, version, "document changed");

        self.dispatch(
            Some(id),
            &DocumentEvent::Changed {
                document_id: id.to_string(),
                version,
            },
        );
        Ok(version)
    }

    /// Close a document, returning it
    ///
    /// # Errors
    ///
    /// Fails if the document is not open.
    pub fn close_document(&mut self, id: &str) -> Result<EditorDocument> {
        let document = self
            .documents
            .remove(id)
            .ok_or_else(|| EditorError::document_not_found(id))?;
        debug!(document_id = id, "document closed");

        self.dispatch(
            None,
            &DocumentEvent::Closed {
                document_id: id.to_string(),
            },
        );
        Ok(document)
    }

    /// Get an open document
    pub fn document(&self, id: &str) -> Option<&EditorDocument> {
        self.documents.get(id)
    }

    /// Ids of the open documents, sorted
    pub fn document_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.documents.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of open documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Completion suggestions for an open document
    ///
    /// # Errors
    ///
    /// Fails if the document is not open.
    pub fn completions(&self, id: &str) -> Result<Vec<CompletionItem>> {
        self.completions_with_prefix(id, None)
    }

    /// Completion suggestions starting with `prefix`
    ///
    /// # Errors
    ///
    /// Fails if the document is not open.
    pub fn completions_with_prefix(
        &self,
        id: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<CompletionItem>> {
        self.require(id)?;
        let config = AutoCompleteConfig::from_lookup(|key| self.settings.get(key).cloned());
        Ok(collect_completions(
            &self.cache,
            id,
            prefix,
            config.max_suggestions,
        ))
    }

    /// Relative semantic token encoding of an open document
    ///
    /// # Errors
    ///
    /// Fails if the document is not open.
    pub fn semantic_tokens(&self, id: &str) -> Result<Vec<u32>> {
        let document = self.require(id)?;
        let mut spans = self.tokenizer.tokenize(document.text());
        SemanticTokensConfig::from_lookup(|key| self.settings.get(key).cloned()).limit(&mut spans);
        Ok(encode_spans(&self.legend, document.text(), spans))
    }

    /// Execute an extension command, optionally against an open document
    ///
    /// # Errors
    ///
    /// Fails if the document is not open, the command is unknown, or the
    /// extension reports an error.
    pub fn execute_command(
        &mut self,
        command_id: &str,
        document_id: Option<&str>,
        args: &HashMap<String, String>,
    ) -> Result<ExtensionResult> {
        let document = match document_id {
            Some(id) => Some(
                self.documents
                    .get(id)
                    .ok_or_else(|| EditorError::document_not_found(id))?,
            ),
            None => None,
        };

        let mut context = EditorContext::new(
            document,
            &self.language,
            &mut self.settings,
            &self.cache,
            self.messages.as_mut(),
        );
        self.extensions
            .execute_command(command_id, args, &mut context)
    }

    /// Replace the identifier lists and reclassify every open document
    ///
    /// # Errors
    ///
    /// Fails if the new lists cannot be compiled; the session keeps its
    /// previous configuration then.
    pub fn set_language_config(&mut self, language: LanguageConfig) -> Result<()> {
        self.tokenizer = SemanticTokenizer::new(&language)?;
        self.language = language;
        self.dispatch(None, &DocumentEvent::LanguageChanged);

        let ids = self.document_ids();
        debug!(documents = ids.len(), "language configuration replaced");
        for id in ids {
            self.dispatch(
                Some(&id),
                &DocumentEvent::Reclassify {
                    document_id: id.clone(),
                },
            );
        }
        Ok(())
    }

    /// Change a setting and notify the extensions
    ///
    /// Host settings for the identifier lists (`fluffsl.keywords`,
    /// `fluffsl.types`, `fluffsl.functions`, `fluffsl.semantics`) take a JSON
    /// array of strings and replace that list through
    /// [`Self::set_language_config`].
    ///
    /// # Errors
    ///
    /// Fails if an identifier list setting is not a JSON array of strings or
    /// cannot be compiled. Nothing changes then.
    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        let mut language = self.language.clone();
        if language.apply_host_setting(&key, &value)? {
            self.set_language_config(language)?;
        }

        let old_value = self.settings.insert(key.clone(), value.clone());
        self.dispatch(
            None,
            &DocumentEvent::ConfigChanged {
                key,
                old_value,
                new_value: value,
            },
        );
        Ok(())
    }

    /// Get an extension setting
    pub fn get_config(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Shared token cache
    pub const fn token_cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Loaded extensions
    pub const fn extensions(&self) -> &ExtensionManager {
        &self.extensions
    }

    /// Legend used by [`Self::semantic_tokens`]
    pub const fn legend(&self) -> &TokenLegend {
        &self.legend
    }

    /// Language configuration of the session
    pub const fn language_config(&self) -> &LanguageConfig {
        &self.language
    }

    /// Session configuration
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            open_documents: self.documents.len(),
            cached_documents: self.cache.len(),
            operations: self.operations,
        }
    }

    /// Shut every extension down and drop all documents and cached tokens
    ///
    /// # Errors
    ///
    /// Returns the first extension shutdown failure.
    pub fn shutdown(&mut self) -> Result<()> {
        let mut context = EditorContext::new(
            None,
            &self.language,
            &mut self.settings,
            &self.cache,
            self.messages.as_mut(),
        );
        let result = self.extensions.shutdown_all(&mut context);

        self.documents.clear();
        self.cache.clear();
        result
    }

    fn require(&self, id: &str) -> Result<&EditorDocument> {
        self.documents
            .get(id)
            .ok_or_else(|| EditorError::document_not_found(id))
    }

    fn dispatch(&mut self, document_id: Option<&str>, event: &DocumentEvent) -> usize {
        self.operations += 1;

        let document = document_id.and_then(|id| self.documents.get(id));
        let mut context = EditorContext::new(
            document,
            &self.language,
            &mut self.settings,
            &self.cache,
            self.messages.as_mut(),
        );
        self.extensions.dispatch_event(event, &mut context)
    }
}
