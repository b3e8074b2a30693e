//! Children normalization.

use crate::lower::{Child, Lowerer};
use hjsx_parser::{single_markup, ArrayElement, BodyItem, Expression, HostPart, ParseError};

/// Normalizes the whitespace of a text run.
///
/// The run is split into lines. Leading whitespace is trimmed from every line
/// but the first and trailing whitespace from every line but the last; lines
/// left empty are dropped and the rest are joined with single spaces.
/// Returns `None` when nothing remains.
///
/// ```
/// use hjsx_transformer::normalize_text;
///
/// assert_eq!(normalize_text("\n    Hello\n    world\n  ").as_deref(), Some("Hello world"));
/// assert_eq!(normalize_text("a "), Some("a ".to_string()));
/// assert_eq!(normalize_text("\n   \n"), None);
/// ```
pub fn normalize_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut line = line.trim_end_matches('\r');
        if i != 0 {
            line = line.trim_start();
        }
        if i != last {
            line = line.trim_end();
        }
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(line);
    }

    (!out.is_empty()).then_some(out)
}

impl Lowerer<'_> {
    /// Lowers a tag body into children, or `None` when none remain.
    pub(crate) fn lower_children(&mut self, body: &[BodyItem]) -> Result<Option<Vec<Child>>, ParseError> {
        let mut children = Vec::new();
        for item in body {
            match item {
                BodyItem::Text(text) => {
                    if let Some(value) = normalize_text(&text.raw) {
                        children.push(Child::Text {
                            value,
                            span: text.span,
                        });
                    }
                }
                BodyItem::Interpolation(interp) => {
                    self.push_expression(&interp.expression, &mut children)?
                }
                BodyItem::Element(node) => children.push(Child::Node(self.lower_node(node)?)),
            }
        }
        Ok((!children.is_empty()).then_some(children))
    }

    /// Pushes the children an interpolated expression contributes.
    ///
    /// Blank expressions contribute nothing, array literals contribute their
    /// elements, and a lone markup expression becomes a nested node.
    fn push_expression(
        &mut self,
        expression: &Expression,
        children: &mut Vec<Child>,
    ) -> Result<(), ParseError> {
        if expression.is_blank() {
            return Ok(());
        }
        let parts = &expression.fragment.parts;
        match &expression.array {
            Some(elements) => self.push_elements(elements, parts, children),
            None => self.push_code(parts, expression.fragment.trailing_line_comment, children),
        }
    }

    /// Pushes array elements in order, flattening nested literal arrays and
    /// skipping holes. Element parts index into `parts`.
    fn push_elements(
        &mut self,
        elements: &[ArrayElement],
        parts: &[HostPart],
        children: &mut Vec<Child>,
    ) -> Result<(), ParseError> {
        for element in elements {
            if element.is_blank() {
                continue;
            }
            match &element.array {
                Some(nested) => self.push_elements(nested, parts, children)?,
                None => self.push_code(
                    element.parts_in(parts),
                    element.trailing_line_comment,
                    children,
                )?,
            }
        }
        Ok(())
    }

    fn push_code(
        &mut self,
        parts: &[HostPart],
        trailing_line_comment: bool,
        children: &mut Vec<Child>,
    ) -> Result<(), ParseError> {
        let child = match single_markup(parts, self.source) {
            Some(node) => Child::Node(self.lower_node(node)?),
            None => Child::Expression(self.lower_code(parts, trailing_line_comment)?),
        };
        children.push(child);
        Ok(())
    }
}
