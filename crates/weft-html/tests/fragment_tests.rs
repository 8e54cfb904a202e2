//! Integration tests for fragment parsing.

use weft_dom::serialize::{inner_html, outer_html};
use weft_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use weft_html::{FragmentContext, ParseOptions, ParsedFragment, parse_document, parse_fragment};

fn fragment(html: &str, context: &str) -> ParsedFragment {
    parse_fragment(
        html,
        Some(&FragmentContext::html(context)),
        &ParseOptions::tracking(100),
    )
}

/// Helper to serialize the fragment's top-level nodes back to markup
fn serialize(tree: &DomTree, nodes: &[NodeId]) -> String {
    nodes.iter().map(|&node| outer_html(tree, node)).collect()
}

fn tag_name(tree: &DomTree, id: NodeId) -> &str {
    tree.as_element(id).map_or("", |data| data.tag_name.as_str())
}

#[test]
fn test_select_context_options() {
    let parsed = fragment("<option>A</option>", "select");
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(tag_name(&parsed.tree, parsed.nodes[0]), "option");
    assert_eq!(parsed.tree.text_content(parsed.nodes[0]), "A");

    let parsed = fragment("<option>A<option>B", "select");
    assert_eq!(
        serialize(&parsed.tree, &parsed.nodes),
        "<option>A</option><option>B</option>"
    );
}

#[test]
fn test_select_context_drops_disallowed_tags() {
    let parsed = fragment("<div><option>A</option></div>", "select");
    assert_eq!(serialize(&parsed.tree, &parsed.nodes), "<option>A</option>");
    assert_eq!(parsed.errors.len(), 2);
}

#[test]
fn test_row_context() {
    let parsed = fragment("<td>cell<td>next", "tr");
    assert_eq!(
        serialize(&parsed.tree, &parsed.nodes),
        "<td>cell</td><td>next</td>"
    );
}

#[test]
fn test_table_context_builds_sections() {
    let parsed = fragment("<tr><td>x", "table");
    assert_eq!(
        serialize(&parsed.tree, &parsed.nodes),
        "<tbody><tr><td>x</td></tr></tbody>"
    );
}

#[test]
fn test_template_context() {
    let parsed = fragment("<tr><td>x</td></tr>", "template");
    assert_eq!(
        serialize(&parsed.tree, &parsed.nodes),
        "<tr><td>x</td></tr>"
    );
}

#[test]
fn test_rcdata_context() {
    let parsed = fragment("<b>x</b>", "textarea");
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.tree.as_text(parsed.nodes[0]), Some("<b>x</b>"));
}

#[test]
fn test_script_context() {
    let parsed = fragment("if (a<b) {}", "script");
    assert_eq!(parsed.tree.text_content(parsed.nodes[0]), "if (a<b) {}");
}

#[test]
fn test_foster_parenting_in_fragment() {
    let parsed = fragment("<table>a</table>", "div");
    assert_eq!(parsed.nodes.len(), 2);
    assert_eq!(parsed.tree.as_text(parsed.nodes[0]), Some("a"));
    assert_eq!(tag_name(&parsed.tree, parsed.nodes[1]), "table");
}

#[test]
fn test_body_and_html_end_tags_are_ignored() {
    let parsed = fragment("x</body></html>y", "body");
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.tree.as_text(parsed.nodes[0]), Some("xy"));
    assert_eq!(parsed.errors.len(), 2);
}

#[test]
fn test_form_ancestor_blocks_nested_form() {
    let context = FragmentContext {
        form_ancestor: true,
        ..FragmentContext::html("div")
    };
    let parsed = parse_fragment("<form><input>", Some(&context), &ParseOptions::default());
    assert_eq!(serialize(&parsed.tree, &parsed.nodes), "<input>");
}

#[test]
fn test_quirks_mode_comes_from_context() {
    let context = FragmentContext {
        quirks_mode: QuirksMode::Quirks,
        ..FragmentContext::html("div")
    };
    let parsed = parse_fragment("<p>x", Some(&context), &ParseOptions::default());
    assert_eq!(parsed.tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_no_context_parses_like_a_document() {
    let parsed = parse_fragment("<p>x", None, &ParseOptions::default());
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(tag_name(&parsed.tree, parsed.nodes[0]), "html");
    let body = parsed.tree.body().expect("body");
    assert_eq!(inner_html(&parsed.tree, body), "<p>x</p>");
}

#[test]
fn test_svg_context() {
    let context = FragmentContext::foreign("g", Namespace::Svg);
    let parsed = parse_fragment(r#"<circle r="1"/><rect/>"#, Some(&context), &ParseOptions::default());
    assert_eq!(parsed.nodes.len(), 2);
    let circle = parsed.tree.as_element(parsed.nodes[0]).expect("circle");
    assert_eq!(circle.tag_name, "circle");
    assert_eq!(circle.namespace, Namespace::Svg);
}

#[test]
fn test_context_deserializes_with_defaults() {
    let context: FragmentContext =
        serde_json::from_str(r#"{ "tag_name": "tr" }"#).expect("valid context");
    assert_eq!(context.namespace, Namespace::Html);
    assert_eq!(context.quirks_mode, QuirksMode::NoQuirks);
    assert!(!context.form_ancestor);
}

#[test]
fn test_serialized_body_reparses_identically() {
    let doc = parse_document(
        "<!DOCTYPE html><p>a<b>b<i>c</b>d</i><table><tr><td>e</table><ul><li>f<li>g</ul>",
        &ParseOptions::default(),
    );
    let body = doc.tree.body().expect("body");
    let first = inner_html(&doc.tree, body);

    let parsed = fragment(&first, "body");
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(serialize(&parsed.tree, &parsed.nodes), first);
}

#[test]
fn test_noscript_text_survives_reserialization() {
    let doc = parse_document(
        "<!DOCTYPE html><body><noscript>&lt;b&gt;x</noscript>",
        &ParseOptions::default(),
    );
    let body = doc.tree.body().expect("body");
    let first = inner_html(&doc.tree, body);
    assert_eq!(first, "<noscript>&lt;b&gt;x</noscript>");

    let parsed = fragment(&first, "body");
    assert_eq!(parsed.nodes.len(), 1);
    let noscript = parsed.nodes[0];
    assert_eq!(parsed.tree.children(noscript).len(), 1);
    assert_eq!(parsed.tree.text_content(noscript), "<b>x");
    assert_eq!(serialize(&parsed.tree, &parsed.nodes), first);
}

#[test]
fn test_self_closing_syntax_survives_reserialization() {
    let doc = parse_document(
        r#"<!DOCTYPE html><svg><circle r="1"/><rect></rect></svg><foo/>x"#,
        &ParseOptions::default(),
    );
    let body = doc.tree.body().expect("body");
    let first = inner_html(&doc.tree, body);
    assert_eq!(first, r#"<svg><circle r="1" /><rect></rect></svg><foo />x"#);

    let parsed = fragment(&first, "body");
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(serialize(&parsed.tree, &parsed.nodes), first);
}

#[test]
fn test_fragment_nodes_are_children_of_root() {
    let parsed = fragment("<p>a</p><!--c-->", "div");
    let root = parsed.tree.document_element().expect("fragment root");
    assert_eq!(parsed.tree.children(root), parsed.nodes.as_slice());
    assert!(matches!(
        &parsed.tree.get(parsed.nodes[1]).expect("comment").node_type,
        NodeType::Comment(data) if data == "c"
    ));
}

#[test]
fn test_fragment_applies_base_href() {
    let options = ParseOptions {
        base_uri: Some("http://example.com/dir/page.html".to_string()),
        ..ParseOptions::default()
    };
    let context = FragmentContext::html("div");
    let parsed = parse_fragment(r#"<base href="../a/"><p>x</p>"#, Some(&context), &options);
    assert_eq!(parsed.base_uri.as_deref(), Some("http://example.com/a/"));
    assert_eq!(parsed.end_tag_closes.len(), 1);
}
