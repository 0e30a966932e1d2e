//! # FSL Core
//!
//! Semantic token classification for FluffSL (`.fsl`) sources. The classifier is a
//! three-pass scanner that tolerates malformed input and never classifies the same
//! character twice.
//!
//! ## Passes
//!
//! 1. **Comments**: block (`/* */`, possibly multi-line) and line (`//`) comments
//! 2. **Brackets**: `()`, `[]` and `{}` paired per kind, colored by nesting depth
//! 3. **Rest**: operators, keywords, types, functions and semantic identifiers
//!
//! Every pass records the columns it claims in a shared [`ExclusionIndex`]; later
//! passes only look at columns nobody has claimed yet.
//!
//! ## Quick Start
//!
//! ```rust
//! use fsl_core::{LanguageConfig, SemanticTokenizer, TokenCategory};
//!
//! let config = LanguageConfig::new().with_keywords(["if", "else"]);
//! let tokenizer = SemanticTokenizer::new(&config)?;
//!
//! let spans = tokenizer.tokenize("if (x) // check\n");
//! assert_eq!(spans[0].category, TokenCategory::Comment);
//! assert!(spans.iter().any(|s| s.category == TokenCategory::Keyword));
//! # Ok::<(), fsl_core::CoreError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod config;
pub mod legend;
pub mod tokenizer;
pub mod utils;

pub use config::{theme::ColorRules, LanguageConfig};
pub use legend::{SemanticTokensBuilder, TokenLegend};
pub use tokenizer::{
    tokenize, BracketKind, ExclusionIndex, LineIndex, PairedBracket, SemanticTokenizer, Span,
    TokenCategory, TokenModifiers,
};
pub use utils::{CoreError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the host settings section holding the identifier lists
pub const SETTINGS_PREFIX: &str = "fluffsl";
