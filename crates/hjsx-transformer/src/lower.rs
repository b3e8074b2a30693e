//! Lowering of parsed markup into constructor calls.
//!
//! Nodes are lowered post-order: attribute values and children first, so a
//! parent only ever holds finished calls. Host code is never rewritten; it
//! is carried as spans and copied during emission.

use crate::attributes::{classify, DataObject};
use crate::tag::{resolve_tag, TagName};
use hjsx_parser::{AttributeValue, Expression, HostFragment, HostPart, MarkupNode, ParseError};
use source_map::Span;

/// A piece of lowered host code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Original text, copied verbatim.
    Source(Span),
    /// A markup expression replaced by its constructor call.
    Call(ConstructorCall),
}

/// Host code with every markup expression inside it lowered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lowered {
    pub pieces: Vec<Piece>,
}

/// A lowered attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A presence-only attribute.
    True,
    /// A quoted attribute, with the raw text between its quotes.
    Str { value: String, span: Span },
    /// An embedded expression.
    Code(Lowered),
}

/// One child of a constructor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// Normalized text.
    Text { value: String, span: Span },
    /// An embedded expression.
    Expression(Lowered),
    /// A nested element.
    Node(ConstructorCall),
}

/// A fully lowered `h(tag, data, children)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorCall {
    pub tag: TagName,
    pub tag_span: Span,
    pub data: DataObject<Value>,
    /// `None` when the element ends up with no children.
    pub children: Option<Vec<Child>>,
    pub span: Span,
}

/// Walks a parsed program, lowering markup and counting nodes.
pub(crate) struct Lowerer<'src> {
    pub(crate) source: &'src str,
    pub(crate) node_count: usize,
}

impl<'src> Lowerer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            node_count: 0,
        }
    }

    /// Lowers a host fragment, keeping its code exactly as written.
    pub(crate) fn lower_fragment(&mut self, fragment: &HostFragment) -> Result<Lowered, ParseError> {
        self.lower_parts(&fragment.parts)
    }

    fn lower_parts(&mut self, parts: &[HostPart]) -> Result<Lowered, ParseError> {
        let mut pieces = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                HostPart::Code(span) => pieces.push(Piece::Source(*span)),
                HostPart::Markup(node) => pieces.push(Piece::Call(self.lower_node(node)?)),
            }
        }
        Ok(Lowered { pieces })
    }

    /// Lowers an embedded expression, dropping the whitespace around it.
    pub(crate) fn lower_expression(&mut self, expression: &Expression) -> Result<Lowered, ParseError> {
        let fragment = &expression.fragment;
        self.lower_code(&fragment.parts, fragment.trailing_line_comment)
    }

    /// Lowers the parts of an embedded expression, dropping the whitespace
    /// around them.
    ///
    /// A trailing `//` comment keeps its line break, or it would swallow the
    /// punctuation emitted after it.
    pub(crate) fn lower_code(
        &mut self,
        parts: &[HostPart],
        trailing_line_comment: bool,
    ) -> Result<Lowered, ParseError> {
        let mut lowered = self.lower_parts(parts)?;

        if let Some(Piece::Source(span)) = lowered.pieces.first_mut() {
            let text = span.slice(self.source);
            let trimmed = text.len() - text.trim_start().len();
            *span = Span::from_range(span.range().start + trimmed..span.range().end);
        }
        if let Some(Piece::Source(span)) = lowered.pieces.last_mut() {
            let text = span.slice(self.source);
            let mut end = span.range().start + text.trim_end().len();
            if trailing_line_comment {
                let rest = &self.source[end..span.range().end];
                if rest.starts_with("\r\n") {
                    end += 2;
                } else if rest.starts_with('\n') {
                    end += 1;
                }
            }
            *span = Span::from_range(span.range().start..end);
        }
        lowered
            .pieces
            .retain(|piece| !matches!(piece, Piece::Source(span) if span.is_empty()));

        Ok(lowered)
    }

    pub(crate) fn lower_node(&mut self, node: &MarkupNode) -> Result<ConstructorCall, ParseError> {
        let tag = resolve_tag(&node.tag)?;

        let mut data = DataObject::new();
        for attr in &node.attributes {
            let classified = classify(attr)?;
            let value = match &attr.value {
                AttributeValue::True => Value::True,
                AttributeValue::Literal(lit) => Value::Str {
                    value: lit.value.clone(),
                    span: lit.span,
                },
                AttributeValue::Expression(interp) => {
                    Value::Code(self.lower_expression(&interp.expression)?)
                }
            };
            data.insert(classified, value);
        }

        let children = self.lower_children(&node.body)?;
        self.node_count += 1;

        Ok(ConstructorCall {
            tag,
            tag_span: node.tag.span,
            data,
            children,
            span: node.span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Bucket, BucketEntry};
    use pretty_assertions::assert_eq;

    fn lower(source: &str) -> (Lowered, usize) {
        let program = hjsx_parser::parse(source).unwrap();
        let mut lowerer = Lowerer::new(source);
        let lowered = lowerer.lower_fragment(&program.fragment).unwrap();
        (lowered, lowerer.node_count)
    }

    fn first_call(lowered: &Lowered) -> &ConstructorCall {
        lowered
            .pieces
            .iter()
            .find_map(|piece| match piece {
                Piece::Call(call) => Some(call),
                Piece::Source(_) => None,
            })
            .unwrap()
    }

    #[test]
    fn test_host_code_is_kept_as_spans() {
        let source = "var a = 1;";
        let (lowered, count) = lower(source);
        assert_eq!(lowered.pieces, vec![Piece::Source(Span::from_range(0..10))]);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_node_count_includes_nested_nodes() {
        let (_, count) = lower("x = <ul><li>{a}</li><li on-click={() => <b/>}/></ul>;");
        assert_eq!(count, 4);
    }

    #[test]
    fn test_expression_values_are_trimmed() {
        let source = "x = <a on-click={  go  }/>";
        let (lowered, _) = lower(source);
        let call = first_call(&lowered);
        let BucketEntry::Keyed { value: Value::Code(code), .. } = &call.data.bucket(Bucket::On)[0]
        else {
            panic!("expected an expression value");
        };
        let Piece::Source(span) = &code.pieces[0] else {
            panic!("expected source");
        };
        assert_eq!(span.slice(source), "go");
    }

    #[test]
    fn test_trailing_line_comment_keeps_its_line_break() {
        let source = "x = <a on-click={go // note\n}/>";
        let (lowered, _) = lower(source);
        let call = first_call(&lowered);
        let BucketEntry::Keyed { value: Value::Code(code), .. } = &call.data.bucket(Bucket::On)[0]
        else {
            panic!("expected an expression value");
        };
        let Piece::Source(span) = &code.pieces[0] else {
            panic!("expected source");
        };
        assert_eq!(span.slice(source), "go // note\n");
    }

    #[test]
    fn test_trailing_block_comment_is_kept_inline() {
        let source = "x = <a on-click={go /* note */ }/>";
        let (lowered, _) = lower(source);
        let call = first_call(&lowered);
        let BucketEntry::Keyed { value: Value::Code(code), .. } = &call.data.bucket(Bucket::On)[0]
        else {
            panic!("expected an expression value");
        };
        let Piece::Source(span) = &code.pieces[0] else {
            panic!("expected source");
        };
        assert_eq!(span.slice(source), "go /* note */");
    }

    #[test]
    fn test_literal_values_keep_raw_text() {
        let source = "x = <a dir=\"ltr\"/>";
        let (lowered, _) = lower(source);
        let call = first_call(&lowered);
        assert_eq!(
            call.data.bucket(Bucket::Attrs)[0],
            BucketEntry::Keyed {
                key: "dir".into(),
                value: Value::Str {
                    value: "ltr".to_string(),
                    span: Span::from_range(11..16),
                },
            }
        );
    }

    #[test]
    fn test_self_closing_has_no_children() {
        let (lowered, _) = lower("x = <input checked/>");
        let call = first_call(&lowered);
        assert_eq!(call.children, None);
        assert_eq!(call.tag, TagName::String("input".into()));
    }

    #[test]
    fn test_invalid_tag_fails() {
        let source = "x = <svg:rect/>";
        let program = hjsx_parser::parse(source).unwrap();
        let error = Lowerer::new(source)
            .lower_fragment(&program.fragment)
            .unwrap_err();
        assert_eq!(error.kind.code(), "invalid-tag-name");
    }
}
