//! Bracket pass of the semantic tokenizer
//!
//! Pairs `()`, `[]` and `{}` with one stack per kind. Kinds never interact:
//! `( [ ) ]` pairs the parentheses and the squares independently. Closers with
//! no opener are dropped and openers left on a stack at the end are never
//! emitted.

use super::exclusion::ExclusionIndex;
use super::lines::LineIndex;
use super::tokens::{BracketKind, BracketSide, Span, TokenCategory, BRACKET_DEPTH_CYCLE};
use tracing::trace;

/// One matched opener/closer pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedBracket {
    /// Delimiter family
    pub kind: BracketKind,
    /// Nesting depth within the kind, already reduced modulo the color cycle
    pub depth: usize,
    pub open_line: usize,
    pub open_column: usize,
    pub close_line: usize,
    pub close_column: usize,
}

impl PairedBracket {
    /// Color category shared by both delimiters
    #[must_use]
    pub const fn category(&self) -> TokenCategory {
        TokenCategory::bracket(self.depth)
    }

    /// Single-character spans for the opener and the closer, in that order
    #[must_use]
    pub const fn spans(&self) -> [Span; 2] {
        let category = self.category();
        [
            Span::new(self.open_line, self.open_column, 1, category),
            Span::new(self.close_line, self.close_column, 1, category),
        ]
    }
}

/// Open delimiters awaiting a closer, one stack per kind
#[derive(Debug, Default)]
struct BracketStacks {
    stacks: [Vec<(usize, usize)>; 3],
}

impl BracketStacks {
    fn push(&mut self, kind: BracketKind, line: usize, column: usize) {
        self.stacks[kind.slot()].push((line, column));
    }

    /// Pop the innermost opener of `kind` together with its depth
    fn pop(&mut self, kind: BracketKind) -> Option<(usize, usize, usize)> {
        let stack = &mut self.stacks[kind.slot()];
        let (line, column) = stack.pop()?;
        Some((line, column, stack.len() % BRACKET_DEPTH_CYCLE))
    }

    fn pending(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }
}

/// Scanner pairing delimiters outside already claimed text
#[derive(Debug, Clone, Copy)]
pub struct BracketMatcher<'a, 'src> {
    lines: &'a LineIndex<'src>,
}

impl<'a, 'src> BracketMatcher<'a, 'src> {
    /// Create a matcher over an indexed source
    #[must_use]
    pub const fn new(lines: &'a LineIndex<'src>) -> Self {
        Self { lines }
    }

    /// Find every matched pair in closing order without touching the index
    #[must_use]
    pub fn match_pairs(&self, index: &ExclusionIndex) -> Vec<PairedBracket> {
        let mut stacks = BracketStacks::default();
        let mut pairs = Vec::new();

        for (line, text) in self.lines.iter().enumerate() {
            for (column, byte) in text.bytes().enumerate() {
                let Some((kind, side)) = BracketKind::classify(byte) else {
                    continue;
                };
                if index.contains(line, column..column + 1) {
                    continue;
                }

                match side {
                    BracketSide::Open => stacks.push(kind, line, column),
                    BracketSide::Close => match stacks.pop(kind) {
                        Some((open_line, open_column, depth)) => pairs.push(PairedBracket {
                            kind,
                            depth,
                            open_line,
                            open_column,
                            close_line: line,
                            close_column: column,
                        }),
                        None => trace!(line, column, ?kind, "unmatched closing bracket"),
                    },
                }
            }
        }

        if stacks.pending() > 0 {
            trace!(pending = stacks.pending(), "unclosed brackets left");
        }

        pairs
    }

    /// Run the bracket pass, claiming every emitted delimiter
    pub fn scan(&self, index: &mut ExclusionIndex) -> Vec<Span> {
        let pairs = self.match_pairs(index);
        let mut spans = Vec::with_capacity(pairs.len() * 2);

        for pair in pairs {
            for span in pair.spans() {
                index.add(span.line, span.columns());
                spans.push(span);
            }
        }

        spans
    }
}
