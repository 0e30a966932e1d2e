//! Built-in semantic token extension for FSL documents
//!
//! Re-scans a document whenever it is opened, changed or reclassified, replaces
//! its entry in the shared token cache, and evicts the entry when the document
//! closes. The tokenizer is recompiled when the session's identifier lists
//! change. The `semantic.encode` command produces the relative encoding host
//! editors expect.

use crate::core::{EditorDocument, EditorError, Result};
use crate::events::DocumentEvent;
use crate::extensions::{
    EditorExtension, ExtensionCapability, ExtensionCommand, ExtensionContext, ExtensionInfo,
    ExtensionResult, ExtensionState, MessageLevel,
};
use crate::sessions::TokenCache;
use fsl_core::{SemanticTokenizer, SemanticTokensBuilder, Span, TokenLegend};
use std::collections::HashMap;
use tracing::debug;

/// Setting capping the number of spans kept per scan
pub const MAX_SPANS_KEY: &str = "semantic.max_spans";

/// Configuration for semantic tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SemanticTokensConfig {
    /// Upper bound on spans per document, unlimited when `None`
    pub max_spans: Option<usize>,
}

impl SemanticTokensConfig {
    /// Read the configuration from string settings
    ///
    /// Missing or unparsable values keep their defaults; `0` means unlimited.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_spans = lookup(MAX_SPANS_KEY)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&max| max > 0);
        Self { max_spans }
    }

    /// Apply the span cap, returning how many spans were dropped
    ///
    /// Spans are cut in scan order. Bracket pairs arrive as consecutive
    /// opener and closer spans, so a cut between them drops the opener too and
    /// a pair is never half colored.
    pub fn limit(&self, spans: &mut Vec<Span>) -> usize {
        let Some(max) = self.max_spans.filter(|&max| spans.len() > max) else {
            return 0;
        };

        let total = spans.len();
        spans.truncate(max);
        let brackets = spans.iter().filter(|span| span.category.is_bracket()).count();
        if brackets % 2 == 1 && spans.last().is_some_and(|span| span.category.is_bracket()) {
            spans.pop();
        }
        total - spans.len()
    }
}

/// Encode spans of `text` for a host editor, columns in UTF-16 units
pub fn encode_spans(
    legend: &TokenLegend,
    text: &str,
    spans: impl IntoIterator<Item = Span>,
) -> Vec<u32> {
    let mut builder = SemanticTokensBuilder::new(legend).with_source(text);
    builder.extend(spans);
    builder.build()
}

/// Semantic tokens extension
pub struct SemanticTokensExtension {
    info: ExtensionInfo,
    state: ExtensionState,
    config: SemanticTokensConfig,
    legend: TokenLegend,
    tokenizer: Option<SemanticTokenizer>,
}

impl SemanticTokensExtension {
    /// Create a new, uninitialized semantic tokens extension
    pub fn new() -> Self {
        let info = ExtensionInfo::new(
            "semantic-tokens",
            fsl_core::VERSION,
            "FSL Editor Team",
            "Comment, bracket and identifier classification for FSL sources",
        )
        .with_capability(ExtensionCapability::SyntaxHighlighting)
        .with_capability(ExtensionCapability::CustomCommands)
        .with_capability(ExtensionCapability::EventHandling)
        .with_license("MIT");

        Self {
            info,
            state: ExtensionState::Uninitialized,
            config: SemanticTokensConfig::default(),
            legend: TokenLegend::new(),
            tokenizer: None,
        }
    }

    /// Legend used by `semantic.encode`
    pub const fn legend(&self) -> &TokenLegend {
        &self.legend
    }

    /// Active configuration
    pub const fn config(&self) -> &SemanticTokensConfig {
        &self.config
    }

    fn tokenizer(&self) -> Result<&SemanticTokenizer> {
        self.tokenizer
            .as_ref()
            .ok_or_else(|| EditorError::extension(&self.info.name, "not initialized"))
    }

    /// Classify a document, applying the span cap
    ///
    /// # Errors
    ///
    /// Fails if the extension has not been initialized.
    pub fn tokenize_document(&self, document: &EditorDocument) -> Result<Vec<Span>> {
        let mut spans = self.tokenizer()?.tokenize(document.text());
        let dropped = self.config.limit(&mut spans);
        if dropped > 0 {
            debug!(document_id = document.id(), dropped, "span cap reached");
        }
        Ok(spans)
    }

    /// Classify a document and encode the result for a host editor
    ///
    /// # Errors
    ///
    /// Fails if the extension has not been initialized.
    pub fn encode_document(&self, document: &EditorDocument) -> Result<Vec<u32>> {
        let spans = self.tokenize_document(document)?;
        Ok(encode_spans(&self.legend, document.text(), spans))
    }

    /// Re-scan a document into the shared cache, returning the span count
    fn refresh(&self, document: &EditorDocument, cache: &TokenCache) -> Result<usize> {
        let spans = self.tokenize_document(document)?;
        cache.rebuild(document.id(), document.text(), &spans);
        Ok(spans.len())
    }
}

impl Default for SemanticTokensExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorExtension for SemanticTokensExtension {
    fn info(&self) -> &ExtensionInfo {
        &self.info
    }

    fn initialize(&mut self, context: &mut dyn ExtensionContext) -> Result<()> {
        self.config = SemanticTokensConfig::from_lookup(|key| context.get_config(key));
        self.tokenizer = Some(SemanticTokenizer::new(context.language_config())?);
        self.state = ExtensionState::Active;

        context.show_message("Semantic tokens initialized", MessageLevel::Info)?;
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut dyn ExtensionContext) -> Result<()> {
        self.state = ExtensionState::Shutdown;
        self.tokenizer = None;
        Ok(())
    }

    fn state(&self) -> ExtensionState {
        self.state
    }

    fn execute_command(
        &mut self,
        command_id: &str,
        _args: &HashMap<String, String>,
        context: &mut dyn ExtensionContext,
    ) -> Result<ExtensionResult> {
        let Some(document) = context.current_document() else {
            return Ok(ExtensionResult::failure("No active document"));
        };

        match command_id {
            "semantic.tokenize" => {
                let spans = self.tokenize_document(document)?;
                let literals = context
                    .token_cache()
                    .rebuild(document.id(), document.text(), &spans);
                let lines = document.line_count();
                let message = format!("Classified {} spans in {}", spans.len(), document.id());
                context.show_message(&message, MessageLevel::Success)?;

                Ok(ExtensionResult::success_with_message(message)
                    .with_data("spans", spans.len().to_string())
                    .with_data("lines", lines.to_string())
                    .with_data("literals", literals.to_string()))
            }
            "semantic.encode" => {
                let data = self.encode_document(document)?;
                let encoded: Vec<String> = data.iter().map(u32::to_string).collect();

                Ok(ExtensionResult::success_with_message(format!(
                    "Encoded {} tokens",
                    data.len() / 5
                ))
                .with_data("data", encoded.join(",")))
            }
            _ => Ok(ExtensionResult::failure(format!(
                "Unknown command: {command_id}"
            ))),
        }
    }

    fn commands(&self) -> Vec<ExtensionCommand> {
        vec![
            ExtensionCommand::new(
                "semantic.tokenize",
                "Tokenize Document",
                "Classify the current document and refresh its token cache",
            )
            .with_category("Semantic Tokens"),
            ExtensionCommand::new(
                "semantic.encode",
                "Encode Semantic Tokens",
                "Encode the current document as relative semantic token data",
            )
            .with_category("Semantic Tokens"),
        ]
    }

    fn handle_event(
        &mut self,
        event: &DocumentEvent,
        context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        match event {
            DocumentEvent::Opened { document_id, .. }
            | DocumentEvent::Changed { document_id, .. }
            | DocumentEvent::Reclassify { document_id } => {
                let Some(document) = context.current_document() else {
                    return Ok(());
                };
                if document.id() != document_id {
                    return Ok(());
                }
                let spans = self.refresh(document, context.token_cache())?;
                debug!(document_id = %document_id, spans, "{}", event.description());
            }
            DocumentEvent::Closed { document_id } => {
                context.token_cache().evict(document_id);
            }
            DocumentEvent::LanguageChanged => {
                self.tokenizer = Some(SemanticTokenizer::new(context.language_config())?);
                debug!("{}", event.description());
            }
            DocumentEvent::ConfigChanged { key, .. } if key == MAX_SPANS_KEY => {
                self.config = SemanticTokensConfig::from_lookup(|name| context.get_config(name));
            }
            DocumentEvent::ConfigChanged { .. } => {}
        }
        Ok(())
    }

    fn config_schema(&self) -> HashMap<String, String> {
        let mut schema = HashMap::new();
        schema.insert(MAX_SPANS_KEY.to_string(), "number".to_string());
        schema
    }
}

#[cfg(test)]
#[path = "semantic_tokens_tests.rs"]
mod semantic_tokens_tests;
