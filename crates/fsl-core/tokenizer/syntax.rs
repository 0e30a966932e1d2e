//! Pattern pass of the semantic tokenizer
//!
//! Classifies operators and configured identifiers in the text left unclaimed
//! by the comment and bracket passes. All categories are compiled into a single
//! alternation of named groups, ordered by priority, so the group that produced
//! a match is also its category.

use super::exclusion::ExclusionIndex;
use super::lines::LineIndex;
use super::tokens::{Span, TokenCategory};
use crate::config::LanguageConfig;
use crate::utils::{CoreError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Characters that form operator runs
pub const OPERATOR_SYMBOLS: &str = "+-*/%=!<>&|^~?:";

/// Two-character operators, all of which are also operator runs
pub const COMPOUND_OPERATORS: [&str; 10] =
    ["==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++", "--"];

/// Preprocessor directives always classified as keywords
pub const DIRECTIVES: [&str; 10] = [
    "#include", "#define", "#undef", "#pragma", "#if", "#ifdef", "#ifndef", "#else", "#elif",
    "#endif",
];

/// Capture group names in priority order
const GROUPS: [(&str, TokenCategory); 5] = [
    ("operator", TokenCategory::Operator),
    ("keyword", TokenCategory::Keyword),
    ("type", TokenCategory::Type),
    ("function", TokenCategory::Function),
    ("semantic", TokenCategory::Semantic),
];

/// Compiled classifier for operators and identifier sets
#[derive(Debug, Clone)]
pub struct SyntaxScanner {
    pattern: Regex,
}

impl SyntaxScanner {
    /// Compile the classifier for a language configuration
    ///
    /// Empty sets contribute no alternative and empty members are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] if the combined pattern cannot be
    /// compiled, for example when the identifier sets exceed the regex size
    /// limit.
    pub fn new(config: &LanguageConfig) -> Result<Self> {
        let mut keywords: BTreeSet<&str> = config.keywords.iter().map(String::as_str).collect();
        keywords.extend(DIRECTIVES);

        let members: [Option<String>; 4] = [
            alternation(keywords),
            alternation(config.types.iter().map(String::as_str)),
            alternation(config.functions.iter().map(String::as_str)),
            alternation(config.semantics.iter().map(String::as_str)),
        ];

        let operator = format!("[{}]+", regex::escape(OPERATOR_SYMBOLS));
        let mut branches = vec![format!("(?P<{}>{operator})", GROUPS[0].0)];
        for ((name, _), body) in GROUPS[1..].iter().zip(members) {
            if let Some(body) = body {
                branches.push(format!("(?P<{name}>{body})"));
            }
        }

        let pattern = Regex::new(&branches.join("|"))
            .map_err(|err| CoreError::invalid_pattern(err.to_string()))?;

        Ok(Self { pattern })
    }

    /// Source of the compiled pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Classify the unclaimed text of every line
    ///
    /// Only gaps of the exclusion index are searched, so no match can start in
    /// or run into an already classified range. The index is not modified.
    #[must_use]
    pub fn scan(&self, lines: &LineIndex<'_>, index: &ExclusionIndex) -> Vec<Span> {
        let mut spans = Vec::new();

        for (line, text) in lines.iter().enumerate() {
            for gap in index.gaps(line, text.len()) {
                let Some(haystack) = text.get(..gap.end) else {
                    continue;
                };
                self.scan_gap(line, haystack, gap.start, &mut spans);
            }
        }

        spans
    }

    fn scan_gap(&self, line: usize, haystack: &str, start: usize, spans: &mut Vec<Span>) {
        let mut at = start;

        while at < haystack.len() {
            let Some(captures) = self.pattern.captures_at(haystack, at) else {
                break;
            };
            let Some(whole) = captures.get(0) else {
                break;
            };
            if whole.is_empty() {
                break;
            }

            let category = GROUPS
                .iter()
                .find(|(name, _)| captures.name(name).is_some())
                .map(|&(_, category)| category);
            if let Some(category) = category {
                spans.push(Span::new(line, whole.start(), whole.len(), category));
            }

            at = whole.end();
        }
    }
}

/// Whole-word alternation of escaped members, longest first
///
/// Word boundaries are only asserted next to word characters so members such
/// as `#define` still match after whitespace.
fn alternation<'a>(members: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut members: Vec<&str> = members
        .into_iter()
        .filter(|member| !member.is_empty())
        .collect();
    if members.is_empty() {
        return None;
    }
    members.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    members.dedup();

    let parts: Vec<String> = members
        .into_iter()
        .map(|member| {
            let lead = if member.starts_with(is_word_char) { r"\b" } else { "" };
            let tail = if member.ends_with(is_word_char) { r"\b" } else { "" };
            format!("{lead}{}{tail}", regex::escape(member))
        })
        .collect();

    Some(format!("(?:{})", parts.join("|")))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
