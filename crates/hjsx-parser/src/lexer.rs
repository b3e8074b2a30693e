//! Tag-interior lexer using logos.
//!
//! Only the inside of start and end tags is tokenized here: tag names,
//! attribute names, `=`, quoted values and the delimiters around them. Body
//! text and embedded JavaScript are scanned by the parser directly, since
//! their boundaries depend on context rather than on token shapes.

use logos::Logos;
use source_map::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the full source.
    pub span: Span,
}

/// Token kinds inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `<`
    #[token("<")]
    LAngle,

    /// `</`
    #[token("</")]
    LAngleSlash,

    /// `>`
    #[token(">")]
    RAngle,

    /// `/>`
    #[token("/>")]
    SlashRAngle,

    /// `=`
    #[token("=")]
    Eq,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// A tag or attribute name. Covers `div`, `on-click`, `xmlns:xlink`,
    /// `this.FOO` and `key_`.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$:.\-]*")]
    Name,

    /// `"..."`
    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    /// `'...'`
    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// A quote with no closing partner before the end of input.
    #[regex(r#""[^"]*"#)]
    #[regex(r"'[^']*")]
    UnterminatedString,

    /// End of input.
    Eof,

    /// Anything else.
    #[default]
    Error,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LAngle => "'<'",
            TokenKind::LAngleSlash => "'</'",
            TokenKind::RAngle => "'>'",
            TokenKind::SlashRAngle => "'/>'",
            TokenKind::Eq => "'='",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Name => "name",
            TokenKind::DoubleQuoted | TokenKind::SingleQuoted => "string",
            TokenKind::UnterminatedString => "unterminated string",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }

    /// Returns true for quoted attribute values.
    pub fn is_string(&self) -> bool {
        matches!(self, TokenKind::DoubleQuoted | TokenKind::SingleQuoted)
    }
}

/// A lexer over the tail of a source string.
///
/// Spans are reported relative to the full source, so a lexer started at
/// offset 40 yields a first token whose span starts at 40 or later.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    offset: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer for the whole of `source`.
    pub fn new(source: &'src str) -> Self {
        Self::at(source, 0)
    }

    /// Creates a lexer that starts at byte `offset` of `source`.
    pub fn at(source: &'src str, offset: usize) -> Self {
        Self {
            inner: TokenKind::lexer(&source[offset..]),
            source,
            offset,
            finished: false,
        }
    }

    /// Returns the text of the most recent token.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    fn span(&self) -> Span {
        let span = self.inner.span();
        Span::from_range(self.offset + span.start..self.offset + span.end)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Token {
                kind,
                span: self.span(),
            }),
            Some(Err(())) => Some(Token {
                kind: TokenKind::Error,
                span: self.span(),
            }),
            None => {
                self.finished = true;
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::empty(text_size::TextSize::from(self.source.len() as u32)),
                })
            }
        }
    }
}
