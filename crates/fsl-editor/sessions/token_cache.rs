//! Per-document cache of classified identifiers
//!
//! After every scan the literal text of each span is grouped by category and
//! stored under the document's id. Completion reads these sets back to
//! suggest identifiers the document already uses. Entries are replaced
//! wholesale on re-scan and dropped when the document closes.

use ahash::RandomState;
use fsl_core::utils::create_hash_map;
use fsl_core::{LineIndex, Span, TokenCategory};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Distinct literals of one document, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CachedTokens {
    by_category: BTreeMap<TokenCategory, BTreeSet<String>>,
}

impl CachedTokens {
    /// Group the text covered by `spans` by category
    ///
    /// Spans that do not fit their line are skipped.
    #[must_use]
    pub fn from_spans(text: &str, spans: &[Span]) -> Self {
        let lines = LineIndex::new(text);
        let mut by_category: BTreeMap<TokenCategory, BTreeSet<String>> = BTreeMap::new();

        for span in spans {
            let Some(literal) = lines.line(span.line).and_then(|line| span.text(line)) else {
                continue;
            };
            by_category
                .entry(span.category)
                .or_default()
                .insert(literal.to_string());
        }

        Self { by_category }
    }

    /// Literals seen for a category
    #[must_use]
    pub fn get(&self, category: TokenCategory) -> Option<&BTreeSet<String>> {
        self.by_category.get(&category)
    }

    /// Check whether `literal` was seen as `category`
    #[must_use]
    pub fn contains(&self, category: TokenCategory, literal: &str) -> bool {
        self.get(category).is_some_and(|set| set.contains(literal))
    }

    /// Categories with at least one literal, in legend order
    pub fn categories(&self) -> impl Iterator<Item = TokenCategory> + '_ {
        self.by_category.keys().copied()
    }

    /// Total number of distinct `(category, literal)` entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    /// Check if nothing was cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// Shared, thread-safe map from document id to its cached tokens
///
/// Clones share the same storage. Each write replaces a whole entry, so
/// concurrent rebuilds of one document resolve as last write wins.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<String, Arc<CachedTokens>, RandomState>>>,
}

impl TokenCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(create_hash_map())),
        }
    }

    /// Rebuild the entry of `document_id` from a fresh scan
    ///
    /// Returns the number of distinct literals stored.
    pub fn rebuild(&self, document_id: &str, text: &str, spans: &[Span]) -> usize {
        let tokens = CachedTokens::from_spans(text, spans);
        let count = tokens.len();
        self.insert(document_id, tokens);
        debug!(document_id, literals = count, "token cache rebuilt");
        count
    }

    /// Store `tokens` as the entry of `document_id`, replacing any previous one
    pub fn insert(&self, document_id: &str, tokens: CachedTokens) {
        self.entries
            .write()
            .insert(document_id.to_string(), Arc::new(tokens));
    }

    /// Snapshot of a document's entry
    #[must_use]
    pub fn get(&self, document_id: &str) -> Option<Arc<CachedTokens>> {
        self.entries.read().get(document_id).cloned()
    }

    /// Check whether a document has an entry
    #[must_use]
    pub fn contains(&self, document_id: &str) -> bool {
        self.entries.read().contains_key(document_id)
    }

    /// Drop a document's entry, returning whether one existed
    pub fn evict(&self, document_id: &str) -> bool {
        let removed = self.entries.write().remove(document_id).is_some();
        if removed {
            debug!(document_id, "token cache evicted");
        }
        removed
    }

    /// Number of cached documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if no document is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
