//! Token legend and relative encoding for host editors
//!
//! Editors receive semantic tokens as a flat `u32` array of 5-tuples
//! `(delta_line, delta_start, length, token_type, token_modifiers)`, where
//! `token_type` indexes the legend registered at startup. [`TokenLegend`] is that
//! registration and [`SemanticTokensBuilder`] produces the array.
//!
//! Spans carry UTF-8 byte columns. Hosts count columns in UTF-16 code units, so a
//! builder given the source text via [`SemanticTokensBuilder::with_source`]
//! converts `delta_start` and `length` per line.
//!
//! # Example
//!
//! ```rust
//! use fsl_core::{SemanticTokensBuilder, Span, TokenCategory, TokenLegend};
//!
//! let legend = TokenLegend::new();
//! let mut builder = SemanticTokensBuilder::new(&legend);
//! builder.push(Span::new(1, 4, 2, TokenCategory::Keyword));
//! builder.push(Span::new(0, 0, 3, TokenCategory::Comment));
//!
//! assert_eq!(builder.build(), vec![0, 0, 3, 0, 0, 1, 4, 2, 2, 0]);
//! ```

use crate::tokenizer::{LineIndex, Span, TokenCategory, TokenModifiers};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Token type and modifier names in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TokenLegend {
    token_types: Vec<&'static str>,
    token_modifiers: Vec<&'static str>,
}

impl TokenLegend {
    /// Legend covering every [`TokenCategory`] and [`TokenModifiers`] flag
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_types: TokenCategory::ALL.iter().map(|c| c.as_str()).collect(),
            token_modifiers: TokenModifiers::NAMES.to_vec(),
        }
    }

    /// Token type names, indexed by encoded type
    #[must_use]
    pub fn token_types(&self) -> &[&'static str] {
        &self.token_types
    }

    /// Modifier names, indexed by bit position
    #[must_use]
    pub fn token_modifiers(&self) -> &[&'static str] {
        &self.token_modifiers
    }

    /// Encoded token type of a category
    #[must_use]
    pub const fn type_index(&self, category: TokenCategory) -> u32 {
        category as u32
    }

    /// Encoded modifier bit set
    #[must_use]
    pub const fn modifier_bits(&self, modifiers: TokenModifiers) -> u32 {
        modifiers.bits()
    }

    /// Resolve a legend name back to its category
    #[must_use]
    pub fn category_for_name(&self, name: &str) -> Option<TokenCategory> {
        TokenCategory::from_name(name)
    }
}

impl Default for TokenLegend {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects spans and encodes them relative to each other
#[derive(Debug, Clone)]
pub struct SemanticTokensBuilder<'a> {
    legend: &'a TokenLegend,
    spans: Vec<Span>,
    /// Lines of the scanned text, for UTF-16 columns
    lines: Option<LineIndex<'a>>,
}

impl<'a> SemanticTokensBuilder<'a> {
    /// Create an empty builder for `legend`
    ///
    /// Columns are emitted as the byte offsets the spans carry.
    #[must_use]
    pub const fn new(legend: &'a TokenLegend) -> Self {
        Self {
            legend,
            spans: Vec::new(),
            lines: None,
        }
    }

    /// Emit columns and lengths in UTF-16 code units of `source`
    ///
    /// `source` must be the text the spans were produced from.
    #[must_use]
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.lines = Some(LineIndex::new(source));
        self
    }

    /// Add one span; order does not matter
    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Number of spans collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if no span was pushed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Sort by position and emit the relative 5-tuple encoding
    ///
    /// Positions larger than `u32::MAX` saturate.
    #[must_use]
    pub fn build(mut self) -> Vec<u32> {
        self.spans
            .sort_by_key(|span| (span.line, span.start_column));

        let mut data = Vec::with_capacity(self.spans.len() * 5);
        let mut previous_line = 0;
        let mut previous_start = 0;

        for span in &self.spans {
            let (start, length) = self.host_columns(span);
            let delta_line = span.line - previous_line;
            let delta_start = if delta_line == 0 {
                start - previous_start
            } else {
                start
            };

            data.extend([
                saturate(delta_line),
                saturate(delta_start),
                saturate(length),
                self.legend.type_index(span.category),
                self.legend.modifier_bits(span.modifiers),
            ]);

            previous_line = span.line;
            previous_start = start;
        }

        data
    }

    /// Start column and length in host units
    ///
    /// Spans that do not fit their line keep their byte values.
    fn host_columns(&self, span: &Span) -> (usize, usize) {
        let Some(text) = self.lines.as_ref().and_then(|lines| lines.line(span.line)) else {
            return (span.start_column, span.length);
        };
        match (text.get(..span.start_column), span.text(text)) {
            (Some(before), Some(covered)) => (utf16_len(before), utf16_len(covered)),
            _ => (span.start_column, span.length),
        }
    }
}

impl Extend<Span> for SemanticTokensBuilder<'_> {
    fn extend<T: IntoIterator<Item = Span>>(&mut self, iter: T) {
        self.spans.extend(iter);
    }
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legend_lists_every_category() {
        let legend = TokenLegend::new();
        assert_eq!(legend.token_types().len(), TokenCategory::ALL.len());
        assert_eq!(legend.token_types()[0], "comment");
        assert_eq!(legend.token_types()[26], "bracket4");
        assert_eq!(legend.type_index(TokenCategory::Semantic), 21);
        assert_eq!(
            legend.category_for_name("typeParameter"),
            Some(TokenCategory::TypeParameter)
        );
        assert_eq!(legend.token_modifiers().len(), 6);
    }

    #[test]
    fn modifier_bits_follow_flag_order() {
        let legend = TokenLegend::new();
        let bits = legend.modifier_bits(TokenModifiers::READONLY | TokenModifiers::STATIC);
        assert_eq!(bits, 0b1100);
        assert_eq!(legend.modifier_bits(TokenModifiers::empty()), 0);
    }

    #[test]
    fn encodes_same_line_and_new_line_deltas() {
        let legend = TokenLegend::new();
        let mut builder = SemanticTokensBuilder::new(&legend);
        builder.extend([
            Span::new(2, 1, 1, TokenCategory::Bracket0),
            Span::new(0, 5, 2, TokenCategory::Operator),
            Span::new(0, 0, 2, TokenCategory::Keyword),
            Span::new(2, 7, 1, TokenCategory::Bracket0),
        ]);
        assert_eq!(builder.len(), 4);

        assert_eq!(
            builder.build(),
            vec![
                0, 0, 2, 2, 0, //
                0, 5, 2, 5, 0, //
                2, 1, 1, 22, 0, //
                0, 6, 1, 22, 0,
            ]
        );
    }

    #[test]
    fn source_columns_count_utf16_units() {
        let source = "// 中文\n(a)";
        let spans = crate::tokenize(source, &crate::LanguageConfig::new()).unwrap();
        let legend = TokenLegend::new();

        let mut bytes = SemanticTokensBuilder::new(&legend);
        bytes.extend(spans.iter().copied());
        assert_eq!(bytes.build()[..3], [0, 0, 9]);

        let mut builder = SemanticTokensBuilder::new(&legend).with_source(source);
        builder.extend(spans);
        assert_eq!(
            builder.build(),
            vec![
                0, 0, 5, 0, 0, //
                1, 0, 1, 22, 0, //
                0, 2, 1, 22, 0,
            ]
        );
    }

    #[test]
    fn columns_after_wide_text_shift_to_utf16() {
        let source = "é (x) 😀 [y]";
        let legend = TokenLegend::new();
        let mut builder = SemanticTokensBuilder::new(&legend).with_source(source);
        builder.extend([
            Span::new(0, 3, 1, TokenCategory::Bracket0),
            Span::new(0, 5, 1, TokenCategory::Bracket0),
            Span::new(0, 12, 1, TokenCategory::Bracket0),
            Span::new(0, 14, 1, TokenCategory::Bracket0),
        ]);

        // é is one UTF-16 unit in two bytes; the emoji is two units in four bytes
        assert_eq!(
            builder.build(),
            vec![
                0, 2, 1, 22, 0, //
                0, 2, 1, 22, 0, //
                0, 5, 1, 22, 0, //
                0, 2, 1, 22, 0,
            ]
        );
    }

    #[test]
    fn empty_builder_encodes_nothing() {
        let legend = TokenLegend::default();
        let builder = SemanticTokensBuilder::new(&legend);
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }
}
