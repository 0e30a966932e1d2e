//! Rendering of tokenizer and completion results for the terminal

use anyhow::Result;
use fsl_core::{ColorRules, LineIndex, SemanticTokensBuilder, Span, TokenLegend};
use fsl_editor::CompletionItem;
use serde::Serialize;
use std::fmt::Write as _;

const RESET: &str = "\x1b[0m";

/// Spans in reading order
pub fn sorted(spans: &[Span]) -> Vec<Span> {
    let mut spans = spans.to_vec();
    spans.sort_by_key(|span| (span.line, span.start_column));
    spans
}

/// One `line:column  category  text` row per span, zero-based positions
///
/// With `colors`, the covered text is wrapped in the category's foreground.
pub fn render_text(source: &str, spans: &[Span], colors: Option<&ColorRules>) -> String {
    let lines = LineIndex::new(source);
    let mut out = String::new();

    for span in sorted(spans) {
        let literal = lines
            .line(span.line)
            .and_then(|line| span.text(line))
            .unwrap_or_default();
        let category = span.category.as_str();

        let _ = match colors.and_then(|rules| rules.for_category(span.category)) {
            Some(color) => writeln!(
                out,
                "{}:{}\t{category:<14}\t{}{literal}{RESET}",
                span.line,
                span.start_column,
                color.ansi_foreground()
            ),
            None => writeln!(
                out,
                "{}:{}\t{category:<14}\t{literal}",
                span.line, span.start_column
            ),
        };
    }

    out
}

/// Spans as a JSON array
pub fn render_json(spans: &[Span]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&sorted(spans))?)
}

#[derive(Serialize)]
struct Encoded<'a> {
    legend: &'a TokenLegend,
    data: Vec<u32>,
}

/// Legend and relative encoding of `source` as a JSON object
pub fn render_encoded(legend: &TokenLegend, source: &str, spans: &[Span]) -> Result<String> {
    let mut builder = SemanticTokensBuilder::new(legend).with_source(source);
    builder.extend(spans.iter().copied());
    let encoded = Encoded {
        legend,
        data: builder.build(),
    };
    Ok(serde_json::to_string_pretty(&encoded)?)
}

/// One `label  kind` row per completion item
pub fn render_completions(items: &[CompletionItem]) -> String {
    let mut out = String::new();
    for item in items {
        let kind = item
            .kind
            .map_or_else(|| "text".to_string(), |kind| format!("{kind:?}"));
        let _ = writeln!(out, "{}\t{kind}", item.label);
    }
    out
}
