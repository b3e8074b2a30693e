//! Parser for JavaScript source with inline tag markup.
//!
//! This crate finds markup expressions such as `<div class="a">{x}</div>`
//! inside otherwise ordinary JavaScript and parses them into a tree. Host
//! code is not parsed; it is kept as byte spans so that later stages can copy
//! it through untouched.
//!
//! - Lexer for tag interiors using `logos`
//! - JavaScript-aware host scanner (strings, templates, comments, regexes)
//! - Recursive descent markup parser
//!
//! Parsing stops at the first error. A file either parses completely or not
//! at all.
//!
//! # Example
//!
//! ```
//! use hjsx_parser::parse;
//!
//! let program = parse("var dom = <div dir=\"ltr\">test</div>;").unwrap();
//! assert_eq!(program.markup_count(), 1);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::{ErrorCategory, ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_map::Span;

/// Default limit on markup nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for parsing.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Maximum nesting of markup and template substitutions before parsing
    /// fails with [`ParseErrorKind::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parses a source file.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a source file with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<Program, ParseError> {
    parser::Parser::new(source, options).parse()
}
