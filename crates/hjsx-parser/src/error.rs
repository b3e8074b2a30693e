//! Parse error types.

use source_map::{LineCol, LineIndex, Span};
use thiserror::Error;

/// An error that stops the transform of one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The 0-based line and column of the error start in `source`.
    pub fn location(&self, source: &str) -> LineCol {
        LineIndex::new(source).line_col(self.span.start)
    }
}

/// Broad class of a [`ParseErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed tokens: unterminated strings, comments, tags or braces.
    Lexical,
    /// Well-formed tokens in an unsupported arrangement.
    Structural,
    /// Constructs reserved for future support.
    SemanticGap,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Lexical => "lexical",
            ErrorCategory::Structural => "structural",
            ErrorCategory::SemanticGap => "semantic-gap",
        }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// The input ended in the middle of a construct.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// A start tag without a matching end tag.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// An end tag that does not match the open tag.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The open tag name.
        expected: String,
        /// The end tag name found.
        found: String,
    },

    /// A quoted string without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A `/*` comment without `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// A `{` interpolation without its closing `}`.
    #[error("unterminated expression: expected '}}'")]
    UnterminatedExpression,

    /// A closing bracket that does not match the innermost open one.
    #[error("unbalanced delimiter: expected '{expected}', found '{found}'")]
    UnbalancedDelimiter {
        /// The closer that would balance the innermost open bracket.
        expected: char,
        /// The closer found.
        found: char,
    },

    /// A bare `}` in tag body text.
    #[error("unexpected '}}' in markup text")]
    UnexpectedCloseBrace,

    /// A tag name form that is neither an element name nor a reference.
    #[error("invalid tag name: {name}")]
    InvalidTagName {
        /// The rejected name.
        name: String,
    },

    /// An attribute that cannot be classified.
    #[error("invalid attribute: {message}")]
    InvalidAttribute {
        /// A description of the problem.
        message: String,
    },

    /// `name={}` with nothing inside the braces.
    #[error("attribute {name} must be assigned a non-empty expression")]
    EmptyAttributeExpression {
        /// The attribute name.
        name: String,
    },

    /// `{...props}` in attribute position.
    #[error("spread attributes are not supported")]
    UnsupportedSpread,

    /// Markup nested deeper than the configured limit.
    #[error("markup nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
}

impl ParseErrorKind {
    /// A stable, kebab-case identifier for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedToken { .. } => "unexpected-token",
            ParseErrorKind::UnexpectedEof { .. } => "unexpected-eof",
            ParseErrorKind::UnclosedTag { .. } => "unclosed-tag",
            ParseErrorKind::MismatchedClosingTag { .. } => "mismatched-closing-tag",
            ParseErrorKind::UnterminatedString => "unterminated-string",
            ParseErrorKind::UnterminatedComment => "unterminated-comment",
            ParseErrorKind::UnterminatedExpression => "unterminated-expression",
            ParseErrorKind::UnbalancedDelimiter { .. } => "unbalanced-delimiter",
            ParseErrorKind::UnexpectedCloseBrace => "unexpected-close-brace",
            ParseErrorKind::InvalidTagName { .. } => "invalid-tag-name",
            ParseErrorKind::InvalidAttribute { .. } => "invalid-attribute",
            ParseErrorKind::EmptyAttributeExpression { .. } => "empty-attribute-expression",
            ParseErrorKind::UnsupportedSpread => "unsupported-spread",
            ParseErrorKind::NestingTooDeep { .. } => "nesting-too-deep",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseErrorKind::UnexpectedEof { .. }
            | ParseErrorKind::UnclosedTag { .. }
            | ParseErrorKind::UnterminatedString
            | ParseErrorKind::UnterminatedComment
            | ParseErrorKind::UnterminatedExpression
            | ParseErrorKind::UnbalancedDelimiter { .. }
            | ParseErrorKind::UnexpectedCloseBrace => ErrorCategory::Lexical,
            ParseErrorKind::UnexpectedToken { .. }
            | ParseErrorKind::MismatchedClosingTag { .. }
            | ParseErrorKind::InvalidTagName { .. }
            | ParseErrorKind::InvalidAttribute { .. }
            | ParseErrorKind::EmptyAttributeExpression { .. }
            | ParseErrorKind::NestingTooDeep { .. } => ErrorCategory::Structural,
            ParseErrorKind::UnsupportedSpread => ErrorCategory::SemanticGap,
        }
    }
}
