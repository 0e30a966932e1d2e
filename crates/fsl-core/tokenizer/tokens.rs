//! Token definitions for the semantic tokenizer
//!
//! Defines the classified [`Span`] produced by every pass, the fixed
//! [`TokenCategory`] enumeration shared with the presentation layer, and the
//! bracket kinds recognized by the bracket pass.

use bitflags::bitflags;
use core::fmt;
use core::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of bracket colors before depths wrap around
pub const BRACKET_DEPTH_CYCLE: usize = 5;

/// Lexical category assigned to a span
///
/// The declaration order is the legend order expected by host editors, so the
/// discriminant doubles as the encoded token type. Only comments, operators,
/// keywords, types, functions, semantic identifiers and brackets are produced by
/// the tokenizer; the remaining variants exist for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TokenCategory {
    Comment,
    String,
    Keyword,
    Number,
    Regexp,
    Operator,
    Namespace,
    Type,
    Struct,
    Class,
    Interface,
    Enum,
    TypeParameter,
    Function,
    Method,
    Decorator,
    Macro,
    Variable,
    Parameter,
    Property,
    Label,
    Semantic,
    Bracket0,
    Bracket1,
    Bracket2,
    Bracket3,
    Bracket4,
}

impl TokenCategory {
    /// Every category in legend order
    pub const ALL: [Self; 27] = [
        Self::Comment,
        Self::String,
        Self::Keyword,
        Self::Number,
        Self::Regexp,
        Self::Operator,
        Self::Namespace,
        Self::Type,
        Self::Struct,
        Self::Class,
        Self::Interface,
        Self::Enum,
        Self::TypeParameter,
        Self::Function,
        Self::Method,
        Self::Decorator,
        Self::Macro,
        Self::Variable,
        Self::Parameter,
        Self::Property,
        Self::Label,
        Self::Semantic,
        Self::Bracket0,
        Self::Bracket1,
        Self::Bracket2,
        Self::Bracket3,
        Self::Bracket4,
    ];

    /// Legend name understood by host editors
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Keyword => "keyword",
            Self::Number => "number",
            Self::Regexp => "regexp",
            Self::Operator => "operator",
            Self::Namespace => "namespace",
            Self::Type => "type",
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::TypeParameter => "typeParameter",
            Self::Function => "function",
            Self::Method => "method",
            Self::Decorator => "decorator",
            Self::Macro => "macro",
            Self::Variable => "variable",
            Self::Parameter => "parameter",
            Self::Property => "property",
            Self::Label => "label",
            Self::Semantic => "semantic",
            Self::Bracket0 => "bracket0",
            Self::Bracket1 => "bracket1",
            Self::Bracket2 => "bracket2",
            Self::Bracket3 => "bracket3",
            Self::Bracket4 => "bracket4",
        }
    }

    /// Look up a category by its legend name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }

    /// Bracket category for a nesting depth, cycling every [`BRACKET_DEPTH_CYCLE`] levels
    #[must_use]
    pub const fn bracket(depth: usize) -> Self {
        match depth % BRACKET_DEPTH_CYCLE {
            0 => Self::Bracket0,
            1 => Self::Bracket1,
            2 => Self::Bracket2,
            3 => Self::Bracket3,
            _ => Self::Bracket4,
        }
    }

    /// Check if this is one of the depth-colored bracket categories
    #[must_use]
    pub const fn is_bracket(self) -> bool {
        matches!(
            self,
            Self::Bracket0 | Self::Bracket1 | Self::Bracket2 | Self::Bracket3 | Self::Bracket4
        )
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Token modifiers understood by host legends
    ///
    /// The tokenizer never sets any modifier; the flags exist so presentation
    /// layers can share one legend with other semantic token providers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenModifiers: u32 {
        const DECLARATION = 1 << 0;
        const DEFINITION = 1 << 1;
        const READONLY = 1 << 2;
        const STATIC = 1 << 3;
        const DEPRECATED = 1 << 4;
        const DOCUMENTATION = 1 << 5;
    }
}

impl TokenModifiers {
    /// Legend names in bit order
    pub const NAMES: [&'static str; 6] = [
        "declaration",
        "definition",
        "readonly",
        "static",
        "deprecated",
        "documentation",
    ];
}

/// A classified range of one physical line
///
/// Columns and lengths are byte offsets into the line, excluding the line
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Span {
    /// Zero-based line number
    pub line: usize,
    /// Zero-based start column in bytes
    pub start_column: usize,
    /// Length in bytes
    pub length: usize,
    /// Assigned category
    pub category: TokenCategory,
    /// Always empty for tokenizer output
    #[cfg_attr(feature = "serde", serde(skip))]
    pub modifiers: TokenModifiers,
}

impl Span {
    /// Create a span without modifiers
    #[must_use]
    pub const fn new(
        line: usize,
        start_column: usize,
        length: usize,
        category: TokenCategory,
    ) -> Self {
        Self {
            line,
            start_column,
            length,
            category,
            modifiers: TokenModifiers::empty(),
        }
    }

    /// Exclusive end column
    #[must_use]
    pub const fn end_column(&self) -> usize {
        self.start_column + self.length
    }

    /// Column range covered on [`Span::line`]
    #[must_use]
    pub const fn columns(&self) -> Range<usize> {
        self.start_column..self.end_column()
    }

    /// Check whether two spans share at least one column on the same line
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.line == other.line
            && self.start_column < other.end_column()
            && other.start_column < self.end_column()
    }

    /// Slice the covered text out of the span's line
    ///
    /// Returns `None` when the columns fall outside the line or split a
    /// multi-byte character.
    #[must_use]
    pub fn text<'a>(&self, line_text: &'a str) -> Option<&'a str> {
        line_text.get(self.columns())
    }
}

/// Delimiter families paired independently by the bracket pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum BracketKind {
    /// `(` and `)`
    Parenthesis,
    /// `[` and `]`
    Square,
    /// `{` and `}`
    Curly,
}

/// Which side of a pair a delimiter opens or closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSide {
    Open,
    Close,
}

impl BracketKind {
    /// Every bracket kind, indexed by [`BracketKind::slot`]
    pub const ALL: [Self; 3] = [Self::Parenthesis, Self::Square, Self::Curly];

    /// Classify a byte as a delimiter
    #[must_use]
    pub const fn classify(byte: u8) -> Option<(Self, BracketSide)> {
        match byte {
            b'(' => Some((Self::Parenthesis, BracketSide::Open)),
            b')' => Some((Self::Parenthesis, BracketSide::Close)),
            b'[' => Some((Self::Square, BracketSide::Open)),
            b']' => Some((Self::Square, BracketSide::Close)),
            b'{' => Some((Self::Curly, BracketSide::Open)),
            b'}' => Some((Self::Curly, BracketSide::Close)),
            _ => None,
        }
    }

    /// Opening delimiter character
    #[must_use]
    pub const fn open_char(self) -> char {
        match self {
            Self::Parenthesis => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    /// Closing delimiter character
    #[must_use]
    pub const fn close_char(self) -> char {
        match self {
            Self::Parenthesis => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }

    /// Stable array slot for per-kind storage
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Parenthesis => 0,
            Self::Square => 1,
            Self::Curly => 2,
        }
    }
}
