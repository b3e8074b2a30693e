//! Tag name resolution.

use hjsx_parser::{ParseError, ParseErrorKind, RawTagName};
use smol_str::SmolStr;

/// How a tag name is passed to the constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// A lowercase element name, emitted as a string literal.
    String(SmolStr),
    /// A component reference such as `Button` or `this.FOO`, emitted
    /// verbatim so the constructor receives the live value.
    Expression(SmolStr),
}

impl TagName {
    pub fn as_str(&self) -> &str {
        match self {
            TagName::String(name) | TagName::Expression(name) => name,
        }
    }
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Resolves a raw tag name to a string or a reference.
///
/// `div`, `my-widget` and `h1` are element names. A name that starts with an
/// uppercase letter or contains a member access is a reference. Anything
/// else, such as `svg:rect` or `a.b-c`, is rejected.
pub fn resolve_tag(raw: &RawTagName) -> Result<TagName, ParseError> {
    let name = raw.name.as_str();

    if is_element_name(name) {
        return Ok(TagName::String(raw.name.clone()));
    }

    let is_reference = name.split('.').all(is_identifier)
        && (name.contains('.') || name.starts_with(|c: char| c.is_ascii_uppercase()));
    if is_reference {
        return Ok(TagName::Expression(raw.name.clone()));
    }

    Err(ParseError::new(
        ParseErrorKind::InvalidTagName {
            name: name.to_string(),
        },
        raw.span,
    ))
}
