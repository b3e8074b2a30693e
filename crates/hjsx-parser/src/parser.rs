//! Recursive descent parser for markup embedded in JavaScript.
//!
//! Host code is scanned byte by byte with just enough JavaScript awareness to
//! find where markup may begin: strings, template literals, comments and
//! regular expression literals are skipped, brackets are balanced, and the
//! previous significant token decides whether a `<` opens a tag or is the
//! less-than operator. Inside a tag the logos lexer takes over.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseOptions;
use smol_str::SmolStr;
use source_map::Span;
use text_size::TextSize;

/// Keywords after which an expression, and therefore markup, may start.
const OPERAND_KEYWORDS: &[&str] = &[
    "return",
    "yield",
    "await",
    "case",
    "default",
    "do",
    "else",
    "in",
    "of",
    "typeof",
    "void",
    "delete",
    "throw",
];

/// Where a host fragment ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// End of input. Unbalanced closers are kept as plain code.
    Eof,
    /// An unmatched `}`.
    Brace,
}

/// The previous significant token in host code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Keyword,
    Operand,
    Punct(u8),
}

impl Prev {
    /// Whether the next token is in operand position, where `<` opens markup
    /// and `/` opens a regular expression.
    fn expects_operand(self) -> bool {
        match self {
            Prev::Start | Prev::Keyword => true,
            Prev::Operand => false,
            Prev::Punct(c) => matches!(
                c,
                b'(' | b'['
                    | b'{'
                    | b','
                    | b';'
                    | b'='
                    | b':'
                    | b'?'
                    | b'!'
                    | b'&'
                    | b'|'
                    | b'+'
                    | b'-'
                    | b'*'
                    | b'/'
                    | b'%'
                    | b'~'
                    | b'^'
                    | b'<'
                    | b'>'
            ),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn closer_for(b: u8) -> u8 {
    match b {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

/// Accumulates the parts of one host fragment.
struct FragmentBuilder {
    start: usize,
    parts: Vec<HostPart>,
    code_start: usize,
    leading: Option<usize>,
    trailing_line_comment: bool,
}

impl FragmentBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            parts: Vec::new(),
            code_start: start,
            leading: None,
            trailing_line_comment: false,
        }
    }

    fn mark(&mut self, pos: usize) {
        if self.leading.is_none() {
            self.leading = Some(pos);
        }
    }

    fn flush(&mut self, end: usize) {
        if end > self.code_start {
            self.parts
                .push(HostPart::Code(Span::from_range(self.code_start..end)));
        }
        self.code_start = end;
    }

    fn push_markup(&mut self, node: MarkupNode, end: usize) {
        self.parts.push(HostPart::Markup(node));
        self.code_start = end;
    }

    fn finish(mut self, end: usize) -> HostFragment {
        self.flush(end);
        HostFragment {
            parts: self.parts,
            span: Span::from_range(self.start..end),
            leading: self.leading.map(offset),
            trailing_line_comment: self.trailing_line_comment,
        }
    }
}

fn offset(pos: usize) -> TextSize {
    TextSize::from(pos as u32)
}

/// The expression itself, or one element of an open array literal.
struct ArrayLevel {
    /// Bracket depth of code directly at this level.
    depth: usize,
    /// Where the current element starts.
    start: usize,
    /// Index of the current element's first part.
    first_part: usize,
    leading: Option<usize>,
    /// Elements of an array literal that was the first token at this level
    /// and has not been followed by anything since.
    pending: Option<Vec<ArrayElement>>,
    elements: Vec<ArrayElement>,
}

impl ArrayLevel {
    fn new(depth: usize, start: usize, first_part: usize) -> Self {
        Self {
            depth,
            start,
            first_part,
            leading: None,
            pending: None,
            elements: Vec::new(),
        }
    }
}

/// Finds literal arrays while an expression is scanned, in the same pass
/// that finds the markup inside them.
struct ArrayTracker {
    root: ArrayLevel,
    open: Vec<ArrayLevel>,
}

impl ArrayTracker {
    fn new(start: usize) -> Self {
        Self {
            root: ArrayLevel::new(0, start, 0),
            open: Vec::new(),
        }
    }

    fn top(&mut self) -> &mut ArrayLevel {
        match self.open.last_mut() {
            Some(level) => level,
            None => &mut self.root,
        }
    }

    /// Records a significant token at bracket depth `depth`.
    fn token(&mut self, pos: usize, depth: usize) {
        let top = self.top();
        if top.depth == depth {
            top.leading.get_or_insert(pos);
            top.pending = None;
        }
    }

    /// Whether a `[` at `pos` is the first token of the expression or of an
    /// element, and so may open a literal array.
    fn opens_array(&self, pos: usize, depth: usize) -> bool {
        let top = self.open.last().unwrap_or(&self.root);
        top.depth == depth && top.leading == Some(pos)
    }

    fn open(&mut self, depth: usize, start: usize, first_part: usize) {
        self.open.push(ArrayLevel::new(depth, start, first_part));
    }

    /// Whether a `,` or `]` at `depth` belongs to the innermost open array.
    fn at_separator(&self, depth: usize) -> bool {
        self.open.last().is_some_and(|level| level.depth == depth)
    }

    fn end_element(&mut self, end: usize, end_part: usize, trailing_line_comment: bool) {
        if let Some(level) = self.open.last_mut() {
            level.elements.push(ArrayElement {
                parts: level.first_part..end_part,
                span: Span::from_range(level.start..end),
                leading: level.leading.take().map(offset),
                trailing_line_comment,
                array: level.pending.take(),
            });
        }
    }

    fn next_element(&mut self, start: usize, first_part: usize) {
        if let Some(level) = self.open.last_mut() {
            level.start = start;
            level.first_part = first_part;
        }
    }

    fn close(&mut self) {
        if let Some(level) = self.open.pop() {
            self.top().pending = Some(level.elements);
        }
    }

    fn finish(self) -> Option<Vec<ArrayElement>> {
        self.root.pending
    }
}

/// The parser for one source file.
pub struct Parser<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            depth: 0,
            options,
        }
    }

    /// Parses the whole source.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let fragment = self.parse_fragment()?;
        Ok(Program { fragment })
    }

    // === Helpers ===

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn error(&self, kind: ParseErrorKind, range: std::ops::Range<usize>) -> ParseError {
        ParseError::new(kind, Span::from_range(range))
    }

    fn enter(&mut self, at: usize) -> Result<(), ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                ParseErrorKind::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                at..at + 1,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // === Host code ===

    fn parse_fragment(&mut self) -> Result<HostFragment, ParseError> {
        let mut builder = FragmentBuilder::new(self.pos);
        self.scan_code(Stop::Eof, 0, &mut builder, None)?;
        Ok(builder.finish(self.pos))
    }

    /// Scans host code until `stop`, leaving `pos` on the stopping byte.
    ///
    /// `open` is the offset of the bracket that opened this fragment and is
    /// only used for error locations. With `arrays`, literal arrays are
    /// recorded as they are scanned.
    fn scan_code(
        &mut self,
        stop: Stop,
        open: usize,
        builder: &mut FragmentBuilder,
        mut arrays: Option<&mut ArrayTracker>,
    ) -> Result<(), ParseError> {
        let mut closers: Vec<u8> = Vec::new();
        let mut prev = Prev::Start;
        let mut line_comment = false;

        loop {
            let Some(b) = self.peek_byte(0) else {
                builder.trailing_line_comment = line_comment;
                return match stop {
                    Stop::Eof => Ok(()),
                    Stop::Brace => Err(self.error(
                        ParseErrorKind::UnterminatedExpression,
                        open..open + 1,
                    )),
                };
            };

            if b.is_ascii_whitespace() || b == 0x0b {
                self.pos += 1;
                continue;
            }

            match b {
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    self.skip_line_comment();
                    line_comment = true;
                    continue;
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    self.skip_block_comment()?;
                    line_comment = false;
                    continue;
                }
                _ => {}
            }

            let after_line_comment = std::mem::take(&mut line_comment);
            let depth = closers.len();

            if let Some(arrays) = arrays.as_deref_mut() {
                if (b == b',' || b == b']') && arrays.at_separator(depth) {
                    builder.flush(self.pos);
                    arrays.end_element(self.pos, builder.parts.len(), after_line_comment);
                    self.pos += 1;
                    builder.flush(self.pos);
                    if b == b',' {
                        arrays.next_element(self.pos, builder.parts.len());
                        prev = Prev::Punct(b',');
                    } else {
                        closers.pop();
                        arrays.close();
                        self.leave();
                        prev = Prev::Operand;
                    }
                    continue;
                }
            }

            let ends_fragment =
                stop != Stop::Eof && depth == 0 && matches!(b, b')' | b']' | b'}');
            if !ends_fragment {
                builder.mark(self.pos);
                if let Some(arrays) = arrays.as_deref_mut() {
                    arrays.token(self.pos, depth);
                }
            }

            match b {
                b'/' => {
                    if !(prev.expects_operand() && self.skip_regex()) {
                        self.pos += 1;
                        prev = Prev::Punct(b'/');
                    } else {
                        prev = Prev::Operand;
                    }
                }
                b'"' | b'\'' => {
                    self.skip_string(b)?;
                    prev = Prev::Operand;
                }
                b'`' => {
                    self.skip_template(builder)?;
                    prev = Prev::Operand;
                }
                b'[' if arrays
                    .as_deref()
                    .is_some_and(|arrays| arrays.opens_array(self.pos, depth)) =>
                {
                    self.enter(self.pos)?;
                    closers.push(b']');
                    self.pos += 1;
                    builder.flush(self.pos);
                    if let Some(arrays) = arrays.as_deref_mut() {
                        arrays.open(closers.len(), self.pos, builder.parts.len());
                    }
                    prev = Prev::Punct(b'[');
                }
                b'(' | b'[' | b'{' => {
                    closers.push(closer_for(b));
                    self.pos += 1;
                    prev = Prev::Punct(b);
                }
                b')' | b']' | b'}' => match closers.last() {
                    Some(&expected) if expected == b => {
                        closers.pop();
                        self.pos += 1;
                        prev = Prev::Operand;
                    }
                    Some(&expected) if stop != Stop::Eof => {
                        return Err(self.error(
                            ParseErrorKind::UnbalancedDelimiter {
                                expected: expected as char,
                                found: b as char,
                            },
                            self.pos..self.pos + 1,
                        ));
                    }
                    None if stop == Stop::Brace && b == b'}' => {
                        builder.trailing_line_comment = after_line_comment;
                        return Ok(());
                    }
                    None if stop != Stop::Eof => {
                        return Err(self.error(
                            ParseErrorKind::UnbalancedDelimiter {
                                expected: '}',
                                found: b as char,
                            },
                            self.pos..self.pos + 1,
                        ));
                    }
                    _ => {
                        self.pos += 1;
                        prev = Prev::Operand;
                    }
                },
                b'<' if prev.expects_operand() && self.peek_byte(1).is_some_and(is_ident_start) => {
                    builder.flush(self.pos);
                    let node = self.parse_markup()?;
                    builder.push_markup(node, self.pos);
                    prev = Prev::Operand;
                }
                b'+' | b'-' if prev == Prev::Operand && self.peek_byte(1) == Some(b) => {
                    // Postfix increment or decrement keeps the operand.
                    self.pos += 2;
                }
                b'.' if self.peek_byte(1).is_some_and(|n| n.is_ascii_digit()) => {
                    self.skip_number();
                    prev = Prev::Operand;
                }
                _ if b.is_ascii_digit() => {
                    self.skip_number();
                    prev = Prev::Operand;
                }
                _ if is_ident_start(b) => {
                    let start = self.pos;
                    while self.peek_byte(0).is_some_and(is_ident_continue) {
                        self.pos += 1;
                    }
                    let word = &self.source[start..self.pos];
                    prev = if OPERAND_KEYWORDS.contains(&word) {
                        Prev::Keyword
                    } else {
                        Prev::Operand
                    };
                }
                _ => {
                    self.pos += 1;
                    prev = Prev::Punct(b);
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek_byte(0).is_some_and(|b| b != b'\n') {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        match self.source[start + 2..].find("*/") {
            Some(end) => {
                self.pos = start + 2 + end + 2;
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::UnterminatedComment, start..start + 2)),
        }
    }

    fn skip_number(&mut self) {
        while self
            .peek_byte(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
        {
            self.pos += 1;
        }
    }

    /// Skips a regular expression literal starting at `/`.
    ///
    /// Returns false, leaving `pos` untouched, when no closing `/` appears on
    /// the same line; the `/` is then taken as division.
    fn skip_regex(&mut self) -> bool {
        let mut i = self.pos + 1;
        let mut in_class = false;
        loop {
            match self.bytes.get(i) {
                None | Some(b'\n') => return false,
                Some(b'\\') => i += 2,
                Some(b'[') => {
                    in_class = true;
                    i += 1;
                }
                Some(b']') => {
                    in_class = false;
                    i += 1;
                }
                Some(b'/') if !in_class => {
                    i += 1;
                    while self.bytes.get(i).copied().is_some_and(is_ident_continue) {
                        i += 1;
                    }
                    self.pos = i;
                    return true;
                }
                Some(_) => i += 1,
            }
        }
    }

    /// Skips a `'` or `"` string. An unescaped line break ends the string.
    fn skip_string(&mut self, quote: u8) -> Result<(), ParseError> {
        let start = self.pos;
        let mut i = start + 1;
        loop {
            match self.bytes.get(i) {
                None => {
                    return Err(self.error(ParseErrorKind::UnterminatedString, start..start + 1))
                }
                Some(b'\\') => i += 2,
                Some(b'\n') => {
                    self.pos = i;
                    return Ok(());
                }
                Some(&b) if b == quote => {
                    self.pos = i + 1;
                    return Ok(());
                }
                Some(_) => i += 1,
            }
        }
    }

    /// Skips a template literal, scanning `${ }` substitutions as host code.
    fn skip_template(&mut self, builder: &mut FragmentBuilder) -> Result<(), ParseError> {
        let start = self.pos;
        let mut i = start + 1;
        loop {
            match self.bytes.get(i) {
                None => {
                    return Err(self.error(ParseErrorKind::UnterminatedString, start..start + 1))
                }
                Some(b'\\') => i += 2,
                Some(b'`') => {
                    self.pos = i + 1;
                    return Ok(());
                }
                Some(b'$') if self.bytes.get(i + 1) == Some(&b'{') => {
                    self.pos = i + 2;
                    self.enter(i)?;
                    let scanned = self.scan_code(Stop::Brace, i + 1, builder, None);
                    self.leave();
                    scanned?;
                    // `pos` sits on the closing brace.
                    i = self.pos + 1;
                }
                Some(_) => i += 1,
            }
        }
    }

    // === Expressions ===

    /// Parses `{ ... }` starting at the opening brace.
    fn parse_interpolation(&mut self) -> Result<Interpolation, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let expression = self.parse_expression(open)?;
        self.pos += 1;
        Ok(Interpolation {
            expression,
            span: Span::from_range(open..self.pos),
        })
    }

    /// Parses the code of an interpolation whose `{` is at `open`.
    fn parse_expression(&mut self, open: usize) -> Result<Expression, ParseError> {
        let mut builder = FragmentBuilder::new(self.pos);
        let mut arrays = ArrayTracker::new(self.pos);
        self.scan_code(Stop::Brace, open, &mut builder, Some(&mut arrays))?;
        Ok(Expression {
            fragment: builder.finish(self.pos),
            array: arrays.finish(),
        })
    }

    // === Markup ===

    fn peek(&self) -> Token {
        Lexer::at(self.source, self.pos)
            .next()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::from_range(self.source.len()..self.source.len()),
            })
    }

    fn bump(&mut self, token: Token) {
        self.pos = u32::from(token.span.end) as usize;
    }

    fn describe(&self, token: Token) -> String {
        match token.kind {
            TokenKind::Error | TokenKind::Name => format!("'{}'", token.span.slice(self.source)),
            kind => kind.name().to_string(),
        }
    }

    fn unexpected(&self, token: Token, expected: &str) -> ParseError {
        let kind = match token.kind {
            TokenKind::Eof => ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
            TokenKind::UnterminatedString => ParseErrorKind::UnterminatedString,
            _ => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.describe(token),
            },
        };
        ParseError::new(kind, token.span)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.peek();
        if token.kind == kind {
            self.bump(token);
            Ok(token)
        } else {
            Err(self.unexpected(token, kind.name()))
        }
    }

    /// Parses one tag starting at its `<`.
    fn parse_markup(&mut self) -> Result<MarkupNode, ParseError> {
        let start = self.pos;
        self.enter(start)?;
        let node = self.parse_element(start);
        self.leave();
        node
    }

    fn parse_element(&mut self, start: usize) -> Result<MarkupNode, ParseError> {
        self.expect(TokenKind::LAngle)?;
        let name = self.expect(TokenKind::Name)?;
        let tag = RawTagName {
            name: SmolStr::new(name.span.slice(self.source)),
            span: name.span,
        };

        let mut attributes = Vec::new();
        let self_closing = loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Name => attributes.push(self.parse_attribute(token)?),
                TokenKind::RAngle => {
                    self.bump(token);
                    break false;
                }
                TokenKind::SlashRAngle => {
                    self.bump(token);
                    break true;
                }
                TokenKind::LBrace => return Err(self.spread_or_unexpected(token)),
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedTag {
                            tag_name: tag.name.to_string(),
                        },
                        Span::from_range(start..u32::from(tag.span.end) as usize),
                    ))
                }
                _ => return Err(self.unexpected(token, "attribute name, '>' or '/>'")),
            }
        };

        let body = if self_closing {
            Vec::new()
        } else {
            self.parse_body(&tag, start)?
        };

        Ok(MarkupNode {
            tag,
            attributes,
            body,
            self_closing,
            span: Span::from_range(start..self.pos),
        })
    }

    fn spread_or_unexpected(&self, brace: Token) -> ParseError {
        let open = u32::from(brace.span.start) as usize;
        let inner = &self.source[open + 1..];
        let trimmed = inner.trim_start();
        if trimmed.starts_with("...") {
            let end = open + 1 + (inner.len() - trimmed.len()) + 3;
            ParseError::new(
                ParseErrorKind::UnsupportedSpread,
                Span::from_range(open..end),
            )
        } else {
            self.unexpected(brace, "attribute name")
        }
    }

    fn parse_attribute(&mut self, name: Token) -> Result<Attribute, ParseError> {
        self.bump(name);
        let attr_name = SmolStr::new(name.span.slice(self.source));

        let eq = self.peek();
        if eq.kind != TokenKind::Eq {
            return Ok(Attribute {
                name: attr_name,
                name_span: name.span,
                value: AttributeValue::True,
                span: name.span,
            });
        }
        self.bump(eq);

        let token = self.peek();
        let value = match token.kind {
            kind if kind.is_string() => {
                self.bump(token);
                let quoted = token.span.slice(self.source);
                AttributeValue::Literal(StringLiteral {
                    value: quoted[1..quoted.len() - 1].to_string(),
                    span: token.span,
                })
            }
            TokenKind::LBrace => {
                self.pos = u32::from(token.span.start) as usize;
                let interpolation = self.parse_interpolation()?;
                if interpolation.expression.is_blank() {
                    return Err(ParseError::new(
                        ParseErrorKind::EmptyAttributeExpression {
                            name: attr_name.to_string(),
                        },
                        interpolation.span,
                    ));
                }
                AttributeValue::Expression(interpolation)
            }
            _ => return Err(self.unexpected(token, "attribute value")),
        };

        Ok(Attribute {
            name: attr_name,
            name_span: name.span,
            value,
            span: Span::from_range(u32::from(name.span.start) as usize..self.pos),
        })
    }

    fn parse_body(&mut self, tag: &RawTagName, start: usize) -> Result<Vec<BodyItem>, ParseError> {
        let mut body = Vec::new();
        loop {
            let text_start = self.pos;
            while self
                .peek_byte(0)
                .is_some_and(|b| !matches!(b, b'<' | b'{' | b'}'))
            {
                self.pos += 1;
            }
            if self.pos > text_start {
                body.push(BodyItem::Text(Text {
                    raw: self.source[text_start..self.pos].to_string(),
                    span: Span::from_range(text_start..self.pos),
                }));
            }

            match self.peek_byte(0) {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedTag {
                            tag_name: tag.name.to_string(),
                        },
                        Span::from_range(start..u32::from(tag.span.end) as usize),
                    ))
                }
                Some(b'{') => body.push(BodyItem::Interpolation(self.parse_interpolation()?)),
                Some(b'}') => {
                    return Err(self.error(
                        ParseErrorKind::UnexpectedCloseBrace,
                        self.pos..self.pos + 1,
                    ))
                }
                _ if self.peek_byte(1) == Some(b'/') => {
                    self.parse_end_tag(tag)?;
                    return Ok(body);
                }
                _ if self.peek_byte(1).is_some_and(is_ident_start) => {
                    body.push(BodyItem::Element(self.parse_markup()?));
                }
                _ => {
                    let token = self.peek();
                    self.bump(token);
                    return Err(self.unexpected(self.peek(), "tag name"));
                }
            }
        }
    }

    fn parse_end_tag(&mut self, tag: &RawTagName) -> Result<(), ParseError> {
        let open = self.expect(TokenKind::LAngleSlash)?;
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Name => {
                self.bump(token);
                token.span.slice(self.source)
            }
            TokenKind::RAngle => "",
            _ => return Err(self.unexpected(token, "closing tag name")),
        };

        if tag.name != found {
            return Err(ParseError::new(
                ParseErrorKind::MismatchedClosingTag {
                    expected: tag.name.to_string(),
                    found: found.to_string(),
                },
                open.span.cover(token.span),
            ));
        }

        self.expect(TokenKind::RAngle)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn single_markup(source: &str) -> MarkupNode {
        let program = parse(source).expect("parse failed");
        let markup: Vec<_> = program
            .fragment
            .parts
            .into_iter()
            .filter_map(|part| match part {
                HostPart::Markup(node) => Some(node),
                HostPart::Code(_) => None,
            })
            .collect();
        assert_eq!(markup.len(), 1, "expected exactly one markup expression");
        markup.into_iter().next().unwrap()
    }

    fn error_code(source: &str) -> &'static str {
        parse(source).expect_err("expected an error").kind.code()
    }

    #[test]
    fn test_plain_code_has_no_markup() {
        let source = "var a = b < c; if (x<y) { f<T>(z); }";
        let program = parse(source).unwrap();
        assert_eq!(program.markup_count(), 0);
        assert_eq!(program.fragment.parts.len(), 1);
    }

    #[test]
    fn test_markup_after_assignment() {
        let node = single_markup("var dom = <div>test</div>;");
        assert_eq!(node.tag.name, "div");
        assert!(!node.self_closing);
        assert_eq!(node.body.len(), 1);
    }

    #[test]
    fn test_code_spans_surround_markup() {
        let source = "var dom = <b/>;";
        let program = parse(source).unwrap();
        let spans: Vec<_> = program
            .fragment
            .parts
            .iter()
            .map(|part| match part {
                HostPart::Code(span) => span.slice(source).to_string(),
                HostPart::Markup(node) => format!("<{}>", node.tag.name),
            })
            .collect();
        assert_eq!(spans, vec!["var dom = ", "<b>", ";"]);
    }

    #[test]
    fn test_markup_after_keyword() {
        let node = single_markup("function f() { return <X class=\"foo\"/>; }");
        assert_eq!(node.tag.name, "X");
        assert!(node.self_closing);
    }

    #[test]
    fn test_markup_in_arrow_body() {
        let node = single_markup("const f = () => <span/>;");
        assert_eq!(node.tag.name, "span");
    }

    #[test]
    fn test_less_than_in_strings_and_comments_is_ignored() {
        let source = "var s = '<div>'; // <div>\n/* <p> */ var t = `<b>`; var r = /<a/g;";
        assert_eq!(parse(source).unwrap().markup_count(), 0);
    }

    #[test]
    fn test_markup_in_template_substitution() {
        let source = "var s = `x ${ <i/> } y`;";
        let program = parse(source).unwrap();
        assert_eq!(program.markup_count(), 1);
    }

    #[test]
    fn test_postfix_increment_is_an_operand() {
        let source = "for (;i++ <n;) {}";
        assert_eq!(parse(source).unwrap().markup_count(), 0);
    }

    #[test]
    fn test_attributes() {
        let node = single_markup(
            r#"x = <svg xmlns:xlink="http://www.w3.org/1999/xlink" on-click={go} checked />"#,
        );
        let names: Vec<_> = node.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["xmlns:xlink", "on-click", "checked"]);
        assert!(matches!(
            &node.attributes[0].value,
            AttributeValue::Literal(lit) if lit.value == "http://www.w3.org/1999/xlink"
        ));
        assert!(matches!(node.attributes[1].value, AttributeValue::Expression(_)));
        assert!(matches!(node.attributes[2].value, AttributeValue::True));
        assert!(node.self_closing);
    }

    #[test]
    fn test_single_quoted_attribute() {
        let node = single_markup("x = <a title='it \"works\"'/>");
        assert!(matches!(
            &node.attributes[0].value,
            AttributeValue::Literal(lit) if lit.value == "it \"works\""
        ));
    }

    #[test]
    fn test_object_literal_attribute_value() {
        let node = single_markup("x = <div class_={{ foo: true, bar: false }}>a</div>");
        let AttributeValue::Expression(interp) = &node.attributes[0].value else {
            panic!("expected an expression value");
        };
        let source = "x = <div class_={{ foo: true, bar: false }}>a</div>";
        assert_eq!(
            interp.expression.span().slice(source),
            "{ foo: true, bar: false }"
        );
        assert!(interp.expression.array.is_none());
    }

    #[test]
    fn test_nested_body() {
        let node = single_markup("x = <ul>\n  <li>one</li>\n  <li>{two}</li>\n</ul>;");
        let kinds: Vec<_> = node
            .body
            .iter()
            .map(|item| match item {
                BodyItem::Text(_) => "text",
                BodyItem::Interpolation(_) => "expr",
                BodyItem::Element(_) => "element",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "element", "text", "element", "text"]);
    }

    #[test]
    fn test_empty_interpolation_is_blank() {
        let node = single_markup("x = <input>{}</input>");
        let BodyItem::Interpolation(interp) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        assert!(interp.expression.is_blank());
    }

    #[test]
    fn test_comment_only_interpolation_is_blank() {
        let node = single_markup("x = <p>{/* nothing */}</p>");
        let BodyItem::Interpolation(interp) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        assert!(interp.expression.is_blank());
    }

    #[test]
    fn test_array_literal_elements() {
        let node = single_markup("x = <div>{ [<span></span>, <ul></ul>] }</div>");
        let BodyItem::Interpolation(interp) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        let elements = interp.expression.array.as_ref().expect("array literal");
        assert_eq!(elements.len(), 2);
        assert_eq!(interp.expression.fragment.markup_count(), 2);
    }

    #[test]
    fn test_array_holes_and_nested_arrays() {
        let source = "x = <div>{ [a, , [<b/>, c] /* end */] }</div>";
        let node = single_markup(source);
        let BodyItem::Interpolation(interp) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        let elements = interp.expression.array.as_ref().expect("array literal");
        let blanks: Vec<_> = elements.iter().map(ArrayElement::is_blank).collect();
        assert_eq!(blanks, vec![false, true, false]);
        assert_eq!(elements[0].span.slice(source), " a");
        let nested = elements[2].array.as_ref().expect("nested array");
        assert_eq!(nested.len(), 2);
        let parts = &interp.expression.fragment.parts;
        assert!(matches!(nested[0].parts_in(parts), [HostPart::Markup(_)]));
    }

    #[test]
    fn test_trailing_line_comment_is_recorded() {
        let node = single_markup("x = <div>{a // note\n}{[b // one\n, c]}</div>");
        let BodyItem::Interpolation(first) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        assert!(first.expression.fragment.trailing_line_comment);
        let BodyItem::Interpolation(second) = &node.body[1] else {
            panic!("expected an interpolation");
        };
        assert!(!second.expression.fragment.trailing_line_comment);
        let elements = second.expression.array.as_ref().expect("array literal");
        assert!(elements[0].trailing_line_comment);
        assert!(!elements[1].trailing_line_comment);
    }

    #[test]
    fn test_array_nesting_counts_toward_the_limit() {
        let options = ParseOptions { max_depth: 3 };
        assert!(crate::parse_with_options("x = <a>{[[1]]}</a>", options).is_ok());
        let error = crate::parse_with_options("x = <a>{[[[1]]]}</a>", options).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::NestingTooDeep { limit: 3 });
    }

    #[test]
    fn test_indexed_array_is_not_a_literal_array() {
        let node = single_markup("x = <div>{ [a, b][0] }</div>");
        let BodyItem::Interpolation(interp) = &node.body[0] else {
            panic!("expected an interpolation");
        };
        assert!(interp.expression.array.is_none());
    }

    #[test]
    fn test_markup_inside_attribute_expression() {
        let node = single_markup("x = <div render={() => <b>{y}</b>}/>");
        assert_eq!(node.markup_count(), 2);
    }

    #[test]
    fn test_closing_brace_inside_string_in_expression() {
        let node = single_markup("x = <p>{ \"}\" + '{' }</p>");
        assert_eq!(node.body.len(), 1);
    }

    #[test]
    fn test_member_tag_name() {
        let node = single_markup("x = <this.FOO>test</this.FOO>");
        assert_eq!(node.tag.name, "this.FOO");
    }

    #[test]
    fn test_unclosed_tag() {
        assert_eq!(error_code("x = <div>text"), "unclosed-tag");
    }

    #[test]
    fn test_unterminated_start_tag() {
        assert_eq!(error_code("x = <div class=\"a\""), "unclosed-tag");
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let error = parse("x = <div></span>").unwrap_err();
        assert_eq!(
            error.kind,
            ParseErrorKind::MismatchedClosingTag {
                expected: "div".to_string(),
                found: "span".to_string(),
            }
        );
        assert_eq!(error.span, Span::from_range(9..15));
    }

    #[test]
    fn test_unterminated_interpolation() {
        let error = parse("x = <div>{ a + b </div>").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnterminatedExpression);
        assert_eq!(error.span, Span::from_range(9..10));
    }

    #[test]
    fn test_unbalanced_interpolation() {
        assert_eq!(error_code("x = <div>{ f(a }</div>"), "unbalanced-delimiter");
    }

    #[test]
    fn test_stray_close_brace_in_text() {
        assert_eq!(error_code("x = <div>a } b</div>"), "unexpected-close-brace");
    }

    #[test]
    fn test_unterminated_attribute_string() {
        assert_eq!(error_code("x = <div title=\"a>b</div>"), "unterminated-string");
    }

    #[test]
    fn test_spread_attribute_is_rejected() {
        let error = parse("x = <div {...props}>a</div>").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnsupportedSpread);
        assert_eq!(error.span, Span::from_range(9..13));
    }

    #[test]
    fn test_empty_attribute_expression() {
        assert_eq!(
            error_code("x = <div title={ }>a</div>"),
            "empty-attribute-expression"
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(error_code("x = 1; /* open"), "unterminated-comment");
    }

    #[test]
    fn test_nesting_limit() {
        let options = ParseOptions { max_depth: 2 };
        let error = crate::parse_with_options("x = <a><b><c/></b></a>", options).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::NestingTooDeep { limit: 2 });
    }
}
