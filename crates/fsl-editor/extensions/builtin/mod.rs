//! Built-in extensions for the FSL editor
//!
//! This module provides the extensions every session loads:
//! - Semantic tokens, which keeps the token cache in step with the documents
//! - Auto-completion from the identifiers a document already uses

pub mod auto_complete;
pub mod semantic_tokens;

pub use auto_complete::{AutoCompleteExtension, CompletionItem, CompletionKind};
pub use semantic_tokens::SemanticTokensExtension;

/// Load all built-in extensions into an extension manager
///
/// Semantic tokens loads first since auto-completion depends on it.
pub fn load_builtin_extensions(
    manager: &mut crate::extensions::ExtensionManager,
) -> crate::core::Result<()> {
    manager.load_extension(Box::new(SemanticTokensExtension::new()))?;
    manager.load_extension(Box::new(AutoCompleteExtension::new()))?;
    Ok(())
}
