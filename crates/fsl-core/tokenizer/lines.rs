//! Physical line layout of a source text
//!
//! Splits text on `\n` and `\r\n` once per scan and maps byte offsets back to
//! `(line, column)` positions by binary search over line starts.

use core::ops::Range;

/// Byte ranges of every physical line in a source text
///
/// Each stored range covers the line content without its terminator. A trailing
/// newline yields a final empty line, so `"a\n"` has two lines.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    /// Source text being indexed
    source: &'a str,
    /// Content range of each line
    lines: Vec<Range<usize>>,
}

impl<'a> LineIndex<'a> {
    /// Index the lines of `source`
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;

        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                let end = if offset > start && source.as_bytes()[offset - 1] == b'\r' {
                    offset - 1
                } else {
                    offset
                };
                lines.push(start..end);
                start = offset + 1;
            }
        }
        lines.push(start..source.len());

        Self { source, lines }
    }

    /// Source text this index was built from
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Number of physical lines (at least one)
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Byte range of a line's content within the source
    #[must_use]
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        self.lines.get(line).cloned()
    }

    /// Content of a line without its terminator
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&'a str> {
        self.lines.get(line).map(|range| &self.source[range.clone()])
    }

    /// Iterate over line contents in order
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().map(|range| &self.source[range.clone()])
    }

    /// Map a byte offset to a `(line, column)` position
    ///
    /// Offsets inside a line terminator resolve to the end of that line's
    /// content; offsets past the end clamp to the last line.
    #[must_use]
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self
            .lines
            .partition_point(|range| range.start <= offset)
            .saturating_sub(1);
        let range = &self.lines[line];
        (line, offset.min(range.end) - range.start)
    }
}
