//! End-to-end parser tests over realistic source files.

use hjsx_parser::{
    parse, single_markup, AttributeValue, BodyItem, HostPart, MarkupNode, ParseErrorKind,
    DEFAULT_MAX_DEPTH,
};
use insta::assert_snapshot;

fn markup(program: &hjsx_parser::Program) -> Vec<&MarkupNode> {
    program
        .fragment
        .parts
        .iter()
        .filter_map(|part| match part {
            HostPart::Markup(node) => Some(node),
            HostPart::Code(_) => None,
        })
        .collect()
}

fn error_message(source: &str) -> String {
    let error = parse(source).unwrap_err();
    let loc = error.location(source);
    format!("{}:{}: {} ({})", loc.line + 1, loc.col + 1, error, error.kind.code())
}

#[test]
fn test_parses_a_module_with_several_markup_expressions() {
    let source = r#"
import h from 'snabbdom/h';

function view(state) {
  return <div class-active={state.active} on-click={toggle}>
    <span>{state.label}</span>
    {state.items.map(item => <li key_={item.id}>{item.name}</li>)}
  </div>;
}

const empty = <br/>;
const ratio = a < b ? 1 : 2;
"#;
    let program = parse(source).unwrap();
    let roots = markup(&program);
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].tag.name, "div");
    assert_eq!(roots[1].tag.name, "br");
    assert_eq!(program.markup_count(), 4);
}

#[test]
fn test_code_parts_cover_the_source_without_gaps() {
    let source = "a(<b>{c}</b>, <d/>); e = f < g;";
    let program = parse(source).unwrap();
    let mut cursor = 0u32;
    for part in &program.fragment.parts {
        let span = match part {
            HostPart::Code(span) => *span,
            HostPart::Markup(node) => node.span,
        };
        assert_eq!(u32::from(span.start), cursor);
        cursor = u32::from(span.end);
    }
    assert_eq!(cursor as usize, source.len());
}

#[test]
fn test_array_literal_children_are_recognized() {
    let source = "x = <div>{ [<span></span>, <ul></ul>] }</div>;";
    let program = parse(source).unwrap();
    let root = markup(&program)[0];
    let BodyItem::Interpolation(interp) = &root.body[0] else {
        panic!("expected an interpolation");
    };
    let parts = &interp.expression.fragment.parts;
    let elements = interp.expression.array.as_ref().unwrap();
    let single: Vec<_> = elements
        .iter()
        .map(|element| {
            single_markup(element.parts_in(parts), source).map(|node| node.tag.name.to_string())
        })
        .collect();
    assert_eq!(single, vec![Some("span".to_string()), Some("ul".to_string())]);
}

#[test]
fn test_nested_arrays_of_markup_are_scanned_once() {
    let depth = 60;
    let source = format!("x = {}{};", "<a>{[".repeat(depth), "]}</a>".repeat(depth));
    let program = parse(&source).unwrap();
    assert_eq!(program.markup_count(), depth);

    let root = markup(&program)[0];
    let BodyItem::Interpolation(interp) = &root.body[0] else {
        panic!("expected an interpolation");
    };
    let elements = interp.expression.array.as_ref().unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(interp.expression.fragment.parts.len(), 3);
}

#[test]
fn test_deeply_nested_array_literal_hits_the_depth_limit() {
    let depth = 20_000;
    let source = format!("x = <a>{{{}1{}}}</a>;", "[".repeat(depth), "]".repeat(depth));
    let error = parse(&source).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::NestingTooDeep {
            limit: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn test_attribute_values_keep_their_raw_text() {
    let source = r#"x = <div style="color: red; content: '\n'" dir='ltr'/>;"#;
    let program = parse(source).unwrap();
    let root = markup(&program)[0];
    let values: Vec<_> = root
        .attributes
        .iter()
        .map(|attr| match &attr.value {
            AttributeValue::Literal(lit) => lit.value.clone(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(values, vec![r"color: red; content: '\n'", "ltr"]);
}

#[test]
fn test_division_and_regex_are_told_apart() {
    let source = "var a = b / c / d; var r = /<div>/; var t = (x) / 2 < <p/>;";
    let program = parse(source).unwrap();
    assert_eq!(program.markup_count(), 1);
}

#[test]
fn test_markup_after_return_in_nested_blocks() {
    let source = "if (ok) { while (x) { if (y) return <i/>; } } else { return <b/> }";
    assert_eq!(parse(source).unwrap().markup_count(), 2);
}

#[test]
fn test_error_messages() {
    assert_snapshot!(error_message("x = <div>\n  <p>text</div>"), @"2:10: mismatched closing tag: expected </p>, found </div> (mismatched-closing-tag)");
    assert_snapshot!(error_message("x = <div>"), @"1:5: unclosed tag: <div> (unclosed-tag)");
    assert_snapshot!(error_message("x = <div {...rest}/>"), @"1:10: spread attributes are not supported (unsupported-spread)");
    assert_snapshot!(error_message("x = <a b=></a>"), @"1:10: unexpected token: expected attribute value, found '>' (unexpected-token)");
}

#[test]
fn test_unterminated_host_string_is_an_error() {
    let error = parse("var s = 'abc").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::UnterminatedString);
}

#[test]
fn test_unterminated_template_is_an_error() {
    let error = parse("var s = `abc ${x}").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::UnterminatedString);
}
