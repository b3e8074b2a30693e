//! Source positions for hjsx.
//!
//! Markup transforms replace pieces of a file while copying the rest verbatim.
//! This crate tracks where things came from: byte [`Span`]s into the original
//! text, a [`LineIndex`] for reporting line/column locations, and a
//! [`SourceMap`] recording which generated ranges were copied or derived from
//! which original ranges.

mod builder;
mod line_index;
mod span;

pub use builder::{Mapping, SourceMap, SourceMapBuilder};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
