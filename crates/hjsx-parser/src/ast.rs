//! AST types for JavaScript with embedded markup.
//!
//! The tree keeps host code as spans into the original source rather than as
//! parsed JavaScript. Only markup is structured, along with enough shape
//! information about interpolated expressions to tell empty expressions and
//! literal arrays apart.

use smol_str::SmolStr;
use source_map::Span;
use std::ops::Range;

/// A parsed source file.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Program {
    /// The whole file as host code interleaved with markup.
    pub fragment: HostFragment,
}

impl Program {
    /// Number of markup nodes in the file, nested ones included.
    pub fn markup_count(&self) -> usize {
        self.fragment.markup_count()
    }
}

/// A run of host code that may contain markup expressions.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HostFragment {
    /// Code spans and markup nodes in source order. Together they cover
    /// `span` without gaps.
    pub parts: Vec<HostPart>,
    /// The span of the fragment.
    pub span: Span,
    /// Offset of the first character that is neither whitespace nor part of
    /// a comment. `None` when the fragment holds no code at all.
    pub leading: Option<text_size::TextSize>,
    /// True when the last thing in the fragment is a `//` comment, so code
    /// placed directly after it must start on a new line.
    pub trailing_line_comment: bool,
}

impl HostFragment {
    /// True when the fragment contains only whitespace and comments.
    pub fn is_blank(&self) -> bool {
        self.leading.is_none()
    }

    /// Returns the markup node when the fragment is exactly one markup
    /// expression surrounded by nothing but whitespace and comments.
    pub fn as_single_markup(&self, source: &str) -> Option<&MarkupNode> {
        single_markup(&self.parts, source)
    }

    /// Number of markup nodes in the fragment, nested ones included.
    pub fn markup_count(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                HostPart::Code(_) => 0,
                HostPart::Markup(node) => node.markup_count(),
            })
            .sum()
    }
}

/// One piece of a [`HostFragment`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HostPart {
    /// Host code copied verbatim.
    Code(Span),
    /// A markup expression.
    Markup(MarkupNode),
}

/// One parsed tag with its attributes and body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkupNode {
    /// The tag name as written.
    pub tag: RawTagName,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
    /// Body items in source order. Empty for self-closing tags.
    pub body: Vec<BodyItem>,
    /// Whether the tag was written `<name/>`.
    pub self_closing: bool,
    /// From the opening `<` to the final `>`.
    pub span: Span,
}

impl MarkupNode {
    /// Number of markup nodes in this subtree, including this one.
    pub fn markup_count(&self) -> usize {
        let in_attributes: usize = self
            .attributes
            .iter()
            .map(|attr| match &attr.value {
                AttributeValue::Expression(interp) => interp.expression.markup_count(),
                _ => 0,
            })
            .sum();
        let in_body: usize = self
            .body
            .iter()
            .map(|item| match item {
                BodyItem::Text(_) => 0,
                BodyItem::Interpolation(interp) => interp.expression.markup_count(),
                BodyItem::Element(node) => node.markup_count(),
            })
            .sum();
        1 + in_attributes + in_body
    }
}

/// A tag name as it appears in source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawTagName {
    pub name: SmolStr,
    pub span: Span,
}

/// An attribute on a start tag.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    /// The attribute name as written.
    pub name: SmolStr,
    /// The span of the name.
    pub name_span: Span,
    /// The value.
    pub value: AttributeValue,
    /// From the start of the name to the end of the value.
    pub span: Span,
}

/// The value of an attribute.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AttributeValue {
    /// No `=value`: a presence-only attribute.
    True,
    /// `"..."` or `'...'`.
    Literal(StringLiteral),
    /// `{expr}`.
    Expression(Interpolation),
}

/// A quoted attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringLiteral {
    /// The text between the quotes, taken as-is.
    pub value: String,
    /// The span including the quotes.
    pub span: Span,
}

/// A `{ ... }` interpolation in a body or attribute value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Interpolation {
    /// The code between the braces.
    pub expression: Expression,
    /// The span including the braces.
    pub span: Span,
}

/// An embedded JavaScript expression.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Expression {
    /// The expression code, with any markup inside it parsed.
    pub fragment: HostFragment,
    /// When the whole expression is an array literal `[a, b, ...]`, its
    /// elements in order. Holes and a trailing comma show up as blank
    /// elements.
    pub array: Option<Vec<ArrayElement>>,
}

impl Expression {
    pub fn is_blank(&self) -> bool {
        self.fragment.is_blank()
    }

    pub fn span(&self) -> Span {
        self.fragment.span
    }

    pub fn markup_count(&self) -> usize {
        self.fragment.markup_count()
    }
}

/// One element of a literal array.
///
/// Elements do not own their code. `parts` indexes into the fragment of the
/// [`Expression`] the array belongs to, including for nested arrays, so
/// every markup node is stored once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayElement {
    /// Range of `fragment.parts` holding this element's code.
    pub parts: Range<usize>,
    /// From just after the preceding `[` or `,` to the following `,` or `]`.
    pub span: Span,
    /// First offset that is neither whitespace nor comment. `None` for holes.
    pub leading: Option<text_size::TextSize>,
    /// Same as [`HostFragment::trailing_line_comment`].
    pub trailing_line_comment: bool,
    /// The nested elements when this element is itself a literal array.
    pub array: Option<Vec<ArrayElement>>,
}

impl ArrayElement {
    pub fn is_blank(&self) -> bool {
        self.leading.is_none()
    }

    /// This element's slice of the enclosing expression's fragment parts.
    pub fn parts_in<'a>(&self, parts: &'a [HostPart]) -> &'a [HostPart] {
        &parts[self.parts.clone()]
    }
}

/// One item in a tag body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BodyItem {
    /// Raw text between tags and interpolations.
    Text(Text),
    /// `{expr}`.
    Interpolation(Interpolation),
    /// A nested tag.
    Element(MarkupNode),
}

impl BodyItem {
    pub fn span(&self) -> Span {
        match self {
            BodyItem::Text(text) => text.span,
            BodyItem::Interpolation(interp) => interp.span,
            BodyItem::Element(node) => node.span,
        }
    }
}

/// A raw text run, whitespace included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Text {
    pub raw: String,
    pub span: Span,
}

/// Returns the markup node when `parts` is exactly one markup expression
/// surrounded by nothing but whitespace and comments.
pub fn single_markup<'a>(parts: &'a [HostPart], source: &str) -> Option<&'a MarkupNode> {
    let mut found = None;
    for part in parts {
        match part {
            HostPart::Markup(node) if found.is_none() => found = Some(node),
            HostPart::Markup(_) => return None,
            HostPart::Code(span) => {
                if !is_trivia(span.slice(source)) {
                    return None;
                }
            }
        }
    }
    found
}

/// True when `code` is only whitespace, `//` comments and `/* */` comments.
pub fn is_trivia(code: &str) -> bool {
    let mut rest = code.trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |nl| &after[nl..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            match after.find("*/") {
                Some(end) => rest = &after[end + 2..],
                None => return false,
            }
        } else {
            return false;
        }
        rest = rest.trim_start();
    }
    true
}
