//! Built-in auto-completion extension for FSL documents
//!
//! Suggests identifiers a document already uses, read back from the shared
//! token cache that the semantic tokens extension fills.

use crate::core::Result;
use crate::events::DocumentEvent;
use crate::extensions::{
    EditorExtension, ExtensionCapability, ExtensionCommand, ExtensionContext, ExtensionInfo,
    ExtensionResult, ExtensionState, MessageLevel,
};
use crate::sessions::TokenCache;
use fsl_core::TokenCategory;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Setting capping the number of suggestions
pub const MAX_SUGGESTIONS_KEY: &str = "complete.max_suggestions";

/// Categories offered as completions, in suggestion order
pub const COMPLETION_CATEGORIES: [TokenCategory; 6] = [
    TokenCategory::Keyword,
    TokenCategory::Type,
    TokenCategory::Function,
    TokenCategory::Semantic,
    TokenCategory::Macro,
    TokenCategory::Variable,
];

/// Kind of a completion item as understood by host editors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CompletionKind {
    Function,
    Keyword,
    TypeParameter,
    Variable,
}

impl CompletionKind {
    /// Completion kind for a token category, `None` for generic suggestions
    pub const fn for_category(category: TokenCategory) -> Option<Self> {
        match category {
            TokenCategory::Function => Some(Self::Function),
            TokenCategory::Keyword => Some(Self::Keyword),
            TokenCategory::Type => Some(Self::TypeParameter),
            TokenCategory::Variable => Some(Self::Variable),
            _ => None,
        }
    }
}

/// A completion suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CompletionItem {
    /// Text shown and inserted
    pub label: String,
    /// Kind of completion, `None` for a generic suggestion
    pub kind: Option<CompletionKind>,
    /// Category the literal was classified as
    pub category: TokenCategory,
}

impl CompletionItem {
    /// Create a completion item, deriving the kind from the category
    pub fn new(label: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            label: label.into(),
            kind: CompletionKind::for_category(category),
            category,
        }
    }
}

/// Configuration for auto-completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCompleteConfig {
    /// Maximum number of suggestions to show
    pub max_suggestions: usize,
}

impl Default for AutoCompleteConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 50,
        }
    }
}

impl AutoCompleteConfig {
    /// Read the configuration from string settings
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(max) = lookup(MAX_SUGGESTIONS_KEY) {
            if let Ok(max_val) = max.trim().parse() {
                config.max_suggestions = max_val;
            }
        }
        config
    }
}

/// Completions for a document from the token cache
///
/// Items are grouped by [`COMPLETION_CATEGORIES`], sorted within each group,
/// filtered to labels starting with `prefix` when one is given, and truncated
/// to `limit`. A document without a cache entry yields no items.
pub fn collect_completions(
    cache: &TokenCache,
    document_id: &str,
    prefix: Option<&str>,
    limit: usize,
) -> Vec<CompletionItem> {
    let Some(tokens) = cache.get(document_id) else {
        return Vec::new();
    };

    COMPLETION_CATEGORIES
        .iter()
        .filter_map(|&category| tokens.get(category).map(|literals| (category, literals)))
        .flat_map(|(category, literals)| {
            literals
                .iter()
                .filter(move |literal| match prefix {
                    Some(prefix) => literal.starts_with(prefix),
                    None => true,
                })
                .map(move |literal| CompletionItem::new(literal.as_str(), category))
        })
        .take(limit)
        .collect()
}

/// Auto-completion extension
pub struct AutoCompleteExtension {
    info: ExtensionInfo,
    state: ExtensionState,
    config: AutoCompleteConfig,
}

impl AutoCompleteExtension {
    /// Create a new auto-completion extension
    pub fn new() -> Self {
        let info = ExtensionInfo::new(
            "auto-complete",
            fsl_core::VERSION,
            "FSL Editor Team",
            "Identifier completion from previously classified tokens",
        )
        .with_capability(ExtensionCapability::CodeCompletion)
        .with_capability(ExtensionCapability::CustomCommands)
        .with_dependency("semantic-tokens")
        .with_license("MIT");

        Self {
            info,
            state: ExtensionState::Uninitialized,
            config: AutoCompleteConfig::default(),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &AutoCompleteConfig {
        &self.config
    }

    /// Get completions for a document
    pub fn get_completions(&self, cache: &TokenCache, document_id: &str) -> Vec<CompletionItem> {
        collect_completions(cache, document_id, None, self.config.max_suggestions)
    }
}

impl Default for AutoCompleteExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorExtension for AutoCompleteExtension {
    fn info(&self) -> &ExtensionInfo {
        &self.info
    }

    fn initialize(&mut self, context: &mut dyn ExtensionContext) -> Result<()> {
        self.config = AutoCompleteConfig::from_lookup(|key| context.get_config(key));
        self.state = ExtensionState::Active;

        context.show_message("Auto-completion initialized", MessageLevel::Info)?;
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut dyn ExtensionContext) -> Result<()> {
        self.state = ExtensionState::Shutdown;
        Ok(())
    }

    fn state(&self) -> ExtensionState {
        self.state
    }

    fn execute_command(
        &mut self,
        command_id: &str,
        args: &HashMap<String, String>,
        context: &mut dyn ExtensionContext,
    ) -> Result<ExtensionResult> {
        match command_id {
            "complete.suggest" => {
                let Some(document) = context.current_document() else {
                    return Ok(ExtensionResult::failure("No active document"));
                };

                let prefix = args.get("prefix").map(String::as_str);
                let completions = collect_completions(
                    context.token_cache(),
                    document.id(),
                    prefix,
                    self.config.max_suggestions,
                );

                let mut result = ExtensionResult::success_with_message(format!(
                    "Found {} completions",
                    completions.len()
                ));
                for (i, completion) in completions.iter().enumerate() {
                    result
                        .data
                        .insert(format!("completion_{i}"), completion.label.clone());
                }
                Ok(result)
            }
            _ => Ok(ExtensionResult::failure(format!(
                "Unknown command: {command_id}"
            ))),
        }
    }

    fn commands(&self) -> Vec<ExtensionCommand> {
        vec![ExtensionCommand::new(
            "complete.suggest",
            "Suggest Completions",
            "List identifiers already used in the current document",
        )
        .with_category("Completion")]
    }

    fn handle_event(
        &mut self,
        event: &DocumentEvent,
        context: &mut dyn ExtensionContext,
    ) -> Result<()> {
        if let DocumentEvent::ConfigChanged { key, .. } = event {
            if key == MAX_SUGGESTIONS_KEY {
                self.config = AutoCompleteConfig::from_lookup(|name| context.get_config(name));
            }
        }
        Ok(())
    }

    fn config_schema(&self) -> HashMap<String, String> {
        let mut schema = HashMap::new();
        schema.insert(MAX_SUGGESTIONS_KEY.to_string(), "number".to_string());
        schema
    }
}

#[cfg(test)]
#[path = "auto_complete_tests.rs"]
mod auto_complete_tests;
