//! Three-pass semantic tokenizer for FSL sources
//!
//! Runs the comment, bracket and pattern passes in that fixed order over one
//! shared [`ExclusionIndex`] and concatenates their output. The tokenizer never
//! fails on input text; malformed or unbalanced sources simply produce fewer
//! spans.
//!
//! # Example
//!
//! ```rust
//! use fsl_core::{LanguageConfig, SemanticTokenizer, TokenCategory};
//!
//! let tokenizer = SemanticTokenizer::new(&LanguageConfig::new())?;
//! let spans = tokenizer.tokenize("/* a\nb */");
//!
//! assert_eq!(spans.len(), 2);
//! assert!(spans.iter().all(|s| s.category == TokenCategory::Comment));
//! # Ok::<(), fsl_core::CoreError>(())
//! ```

use crate::config::LanguageConfig;
use crate::utils::Result;
use tracing::debug;

pub mod brackets;
pub mod comments;
pub mod exclusion;
pub mod lines;
pub mod syntax;
pub mod tokens;

pub use brackets::{BracketMatcher, PairedBracket};
pub use comments::CommentScanner;
pub use exclusion::ExclusionIndex;
pub use lines::LineIndex;
pub use syntax::SyntaxScanner;
pub use tokens::{BracketKind, BracketSide, Span, TokenCategory, TokenModifiers};

/// Reusable tokenizer bound to one language configuration
///
/// Compiling the pattern pass is the only fallible step, so it happens once
/// here and every [`SemanticTokenizer::tokenize`] call is infallible.
#[derive(Debug, Clone)]
pub struct SemanticTokenizer {
    syntax: SyntaxScanner,
}

impl SemanticTokenizer {
    /// Build a tokenizer for `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier sets cannot be compiled into a
    /// pattern.
    pub fn new(config: &LanguageConfig) -> Result<Self> {
        Ok(Self {
            syntax: SyntaxScanner::new(config)?,
        })
    }

    /// Classify `source` into comment, bracket and pattern spans
    ///
    /// Spans appear grouped by pass: every comment span first, then bracket
    /// pairs in closing order, then pattern matches in reading order. Within a
    /// line the spans never overlap.
    #[must_use]
    pub fn tokenize(&self, source: &str) -> Vec<Span> {
        let lines = LineIndex::new(source);
        let mut index = ExclusionIndex::new();

        let comments = CommentScanner::new(&lines).scan(&mut index);
        let brackets = BracketMatcher::new(&lines).scan(&mut index);
        let rest = self.syntax.scan(&lines, &index);

        debug!(
            lines = lines.line_count(),
            comments = comments.len(),
            brackets = brackets.len(),
            rest = rest.len(),
            "tokenized source"
        );

        let mut spans = comments;
        spans.reserve(brackets.len() + rest.len());
        spans.extend(brackets);
        spans.extend(rest);
        spans
    }

    /// Access the compiled pattern pass
    #[must_use]
    pub const fn syntax(&self) -> &SyntaxScanner {
        &self.syntax
    }
}

/// One-shot tokenization of `source` under `config`
///
/// # Errors
///
/// Returns an error if the identifier sets cannot be compiled into a pattern.
pub fn tokenize(source: &str, config: &LanguageConfig) -> Result<Vec<Span>> {
    Ok(SemanticTokenizer::new(config)?.tokenize(source))
}
