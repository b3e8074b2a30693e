//! Generated-to-original position mappings.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// One generated range and the original range it was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: Span,
    pub original: Span,
    /// True when the generated text is a byte-for-byte copy of the original.
    pub verbatim: bool,
}

/// Mappings for one transformed file, ordered by generated position.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::new()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Maps a generated offset back into the original text.
    ///
    /// Inside a verbatim mapping the result is exact; inside a derived mapping
    /// (for example a re-quoted string literal) it is the start of the original
    /// range.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = self
            .mappings
            .partition_point(|m| m.generated.start <= generated)
            .checked_sub(1)?;
        let mapping = self.mappings[idx];
        if !mapping.generated.contains(generated) {
            return None;
        }
        if mapping.verbatim {
            Some(mapping.original.start + (generated - mapping.generated.start))
        } else {
            Some(mapping.original.start)
        }
    }

    /// Maps an original offset forward into the generated text.
    pub fn generated_position(&self, original: ByteOffset) -> Option<ByteOffset> {
        let mapping = self
            .mappings
            .iter()
            .find(|m| m.original.contains(original))?;
        if mapping.verbatim {
            Some(mapping.generated.start + (original - mapping.original.start))
        } else {
            Some(mapping.generated.start)
        }
    }
}

/// Records mappings while output text is appended in order.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records `text`, copied unchanged from `original_start`.
    pub fn copy(&mut self, original_start: ByteOffset, text: &str) {
        if text.is_empty() {
            return;
        }
        let len = TextSize::from(text.len() as u32);
        self.push(Span::new(original_start, original_start + len), len, true);
    }

    /// Records `text`, derived from (but not identical to) `original`.
    pub fn derive(&mut self, original: Span, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(original, TextSize::from(text.len() as u32), false);
    }

    /// Records synthetic `text` with no original counterpart.
    pub fn synthesize(&mut self, text: &str) {
        self.generated_offset += TextSize::from(text.len() as u32);
    }

    fn push(&mut self, original: Span, len: TextSize, verbatim: bool) {
        let start = self.generated_offset;
        self.generated_offset += len;

        // Adjacent verbatim copies of adjacent original text collapse into one.
        if let Some(last) = self.mappings.last_mut() {
            if verbatim
                && last.verbatim
                && last.generated.end == start
                && last.original.end == original.start
            {
                last.generated.end = self.generated_offset;
                last.original.end = original.end;
                return;
            }
        }

        self.mappings.push(Mapping {
            generated: Span::new(start, self.generated_offset),
            original,
            verbatim,
        });
    }

    pub fn build(self) -> SourceMap {
        // Appends are monotonic, so the mappings are already sorted.
        SourceMap {
            mappings: self.mappings,
        }
    }
}
