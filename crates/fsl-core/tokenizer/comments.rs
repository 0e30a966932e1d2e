//! Comment pass of the semantic tokenizer
//!
//! Carves block (`/* */`) and line (`//`) comments out of the source before any
//! other pass runs. All block comments are handled first, across the whole
//! text, so line comment detection sees every block comment in the exclusion
//! index.

use super::exclusion::ExclusionIndex;
use super::lines::LineIndex;
use super::tokens::{Span, TokenCategory};

/// Opening marker of a block comment
pub const BLOCK_COMMENT_OPEN: &str = "/*";
/// Closing marker of a block comment
pub const BLOCK_COMMENT_CLOSE: &str = "*/";
/// Marker starting a line comment
pub const LINE_COMMENT_MARKER: &str = "//";

/// Scanner emitting `comment` spans and claiming them in the exclusion index
#[derive(Debug, Clone, Copy)]
pub struct CommentScanner<'a, 'src> {
    lines: &'a LineIndex<'src>,
}

impl<'a, 'src> CommentScanner<'a, 'src> {
    /// Create a scanner over an indexed source
    #[must_use]
    pub const fn new(lines: &'a LineIndex<'src>) -> Self {
        Self { lines }
    }

    /// Run the comment pass: every block comment, then every line comment
    pub fn scan(&self, index: &mut ExclusionIndex) -> Vec<Span> {
        let mut spans = Vec::new();
        self.scan_block_comments(index, &mut spans);
        self.scan_line_comments(index, &mut spans);
        spans
    }

    /// Match each `/*` with the nearest following `*/`
    ///
    /// An unterminated opener ends the block search; it cannot close later.
    fn scan_block_comments(&self, index: &mut ExclusionIndex, spans: &mut Vec<Span>) {
        let source = self.lines.source();
        let mut cursor = 0;

        while let Some(found) = source[cursor..].find(BLOCK_COMMENT_OPEN) {
            let start = cursor + found;
            let body = start + BLOCK_COMMENT_OPEN.len();
            let Some(close) = source[body..].find(BLOCK_COMMENT_CLOSE) else {
                break;
            };
            let end = body + close + BLOCK_COMMENT_CLOSE.len();

            self.emit_block(start..end, index, spans);
            cursor = end;
        }
    }

    /// Emit one span per physical line of a block comment
    fn emit_block(
        &self,
        block: core::ops::Range<usize>,
        index: &mut ExclusionIndex,
        spans: &mut Vec<Span>,
    ) {
        let (first_line, _) = self.lines.position(block.start);
        let (last_line, _) = self.lines.position(block.end - 1);

        for line in first_line..=last_line {
            let Some(content) = self.lines.line_range(line) else {
                continue;
            };
            let from = block.start.max(content.start);
            let to = block.end.min(content.end);
            if to <= from {
                // Blank line inside the comment
                continue;
            }

            let column = from - content.start;
            let length = to - from;
            index.add(line, column..column + length);
            spans.push(Span::new(line, column, length, TokenCategory::Comment));
        }
    }

    /// Find `//` markers outside claimed text and comment out the rest of the line
    ///
    /// Claimed ranges that follow the marker on the same line (block comments)
    /// keep their own spans; only the unclaimed gaps after the marker become
    /// part of the line comment.
    fn scan_line_comments(&self, index: &mut ExclusionIndex, spans: &mut Vec<Span>) {
        for (line, text) in self.lines.iter().enumerate() {
            let mut pieces = Vec::new();

            for gap in index.gaps(line, text.len()) {
                if pieces.is_empty() {
                    if let Some(found) = text[gap.clone()].find(LINE_COMMENT_MARKER) {
                        pieces.push(gap.start + found..gap.end);
                    }
                } else {
                    pieces.push(gap);
                }
            }

            for piece in pieces {
                if index.contains(line, piece.clone()) {
                    continue;
                }
                spans.push(Span::new(
                    line,
                    piece.start,
                    piece.len(),
                    TokenCategory::Comment,
                ));
                index.add(line, piece);
            }
        }
    }
}
