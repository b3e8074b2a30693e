//! Offset to line/column conversion.

use crate::ByteOffset;
use text_size::TextSize;

/// A 0-based line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Start offsets of every line in a text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
    len: ByteOffset,
}

impl LineIndex {
    /// Indexes `text`. Only `\n` starts a new line; a preceding `\r` stays on
    /// the line it ends.
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| TextSize::from(i as u32 + 1)),
            )
            .collect();

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts an offset into a line/column pair.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_col(&self, offset: ByteOffset) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, u32::from(col))
    }

    /// Converts a line/column pair back into an offset.
    pub fn offset(&self, line_col: LineCol) -> Option<ByteOffset> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let offset = start + TextSize::from(line_col.col);
        (offset <= self.len).then_some(offset)
    }

    /// The text of a line without its terminator.
    pub fn line_text<'t>(&self, line: u32, text: &'t str) -> Option<&'t str> {
        let start = u32::from(*self.line_starts.get(line as usize)?) as usize;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|next| u32::from(*next) as usize - 1)
            .unwrap_or(text.len());
        Some(text[start..end].trim_end_matches('\r'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("var a =\n  <div>\n</div>;");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(10)), LineCol::new(1, 2));
        assert_eq!(index.line_col(TextSize::from(16)), LineCol::new(2, 0));
    }

    #[test]
    fn test_line_col_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(TextSize::from(99)), LineCol::new(0, 2));
    }

    #[test]
    fn test_offset_roundtrip() {
        let text = "one\ntwo\r\nthree";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() {
            let offset = TextSize::from(offset as u32);
            assert_eq!(index.offset(index.line_col(offset)), Some(offset));
        }
    }

    #[test]
    fn test_line_text() {
        let text = "one\ntwo\r\nthree";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(0, text), Some("one"));
        assert_eq!(index.line_text(1, text), Some("two"));
        assert_eq!(index.line_text(2, text), Some("three"));
        assert_eq!(index.line_text(3, text), None);
    }
}
