//! Per-line index of already classified column ranges
//!
//! Every tokenizer pass registers the ranges it emits here, and later passes
//! consult it so no character is ever classified twice. Intervals are kept
//! sorted and merged per line, which lets containment queries run as a binary
//! search.

use crate::utils::hashers::create_hash_map;
use ahash::RandomState;
use core::ops::Range;
use std::collections::HashMap;

/// Claimed half-open column intervals, grouped by line
///
/// Invariant: the intervals of a line are sorted by start and neither overlap
/// nor touch; touching inserts are merged into one interval.
#[derive(Debug, Clone)]
pub struct ExclusionIndex {
    lines: HashMap<usize, Vec<Range<usize>>, RandomState>,
}

impl ExclusionIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: create_hash_map(),
        }
    }

    /// Claim `columns` on `line`, merging with overlapping or adjacent intervals
    ///
    /// Empty ranges are ignored.
    pub fn add(&mut self, line: usize, columns: Range<usize>) {
        if columns.is_empty() {
            return;
        }

        let intervals = self.lines.entry(line).or_default();

        // First interval that could touch the new one
        let first = intervals.partition_point(|existing| existing.end < columns.start);
        // One past the last interval that could touch the new one
        let last = intervals.partition_point(|existing| existing.start <= columns.end);

        if first == last {
            intervals.insert(first, columns);
            return;
        }

        let merged =
            intervals[first].start.min(columns.start)..intervals[last - 1].end.max(columns.end);
        intervals.drain(first + 1..last);
        intervals[first] = merged;
    }

    /// Check whether a single stored interval fully covers `columns` on `line`
    ///
    /// Lines without intervals never contain anything.
    #[must_use]
    pub fn contains(&self, line: usize, columns: Range<usize>) -> bool {
        let Some(intervals) = self.lines.get(&line) else {
            return false;
        };

        // Last interval starting at or before the query start
        let candidate = intervals.partition_point(|existing| existing.start <= columns.start);
        candidate > 0 && intervals[candidate - 1].end >= columns.end
    }

    /// Claimed intervals of a line in ascending order
    #[must_use]
    pub fn intervals(&self, line: usize) -> &[Range<usize>] {
        self.lines.get(&line).map_or(&[][..], Vec::as_slice)
    }

    /// Unclaimed sub-ranges of `0..line_len` on `line`, in ascending order
    pub fn gaps(&self, line: usize, line_len: usize) -> Gaps<'_> {
        Gaps {
            intervals: self.intervals(line).iter(),
            cursor: 0,
            line_len,
        }
    }

    /// Number of lines holding at least one interval
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if nothing has been claimed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for ExclusionIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the unclaimed column ranges of one line
#[derive(Debug, Clone)]
pub struct Gaps<'a> {
    intervals: core::slice::Iter<'a, Range<usize>>,
    cursor: usize,
    line_len: usize,
}

impl Iterator for Gaps<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.line_len {
            match self.intervals.next() {
                Some(claimed) => {
                    let gap = self.cursor..claimed.start.min(self.line_len);
                    self.cursor = self.cursor.max(claimed.end);
                    if !gap.is_empty() {
                        return Some(gap);
                    }
                }
                None => {
                    let gap = self.cursor..self.line_len;
                    self.cursor = self.line_len;
                    return Some(gap);
                }
            }
        }
        None
    }
}
