//! Integration tests for SVG and MathML content.

use weft_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};
use weft_html::{ParseOptions, ParsedDocument, dump_tree, parse_document};

fn parse(html: &str) -> ParsedDocument {
    parse_document(html, &ParseOptions::tracking(100))
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

fn element<'a>(doc: &'a ParsedDocument, tag: &str) -> &'a ElementData {
    let id = find_element(&doc.tree, NodeId::ROOT, tag).expect("element exists");
    doc.tree.as_element(id).expect("is an element")
}

#[test]
fn test_svg_elements_get_svg_namespace() {
    let doc = parse(r#"<!DOCTYPE html><svg><path d="M0"/></svg>"#);
    assert_eq!(element(&doc, "svg").namespace, Namespace::Svg);
    assert_eq!(element(&doc, "path").namespace, Namespace::Svg);

    let body = doc.tree.body().expect("body");
    assert_eq!(
        dump_tree(&doc.tree, body, 0),
        "<body>\n  <svg svg>\n    <svg path d=\"M0\">\n"
    );
}

#[test]
fn test_svg_tag_names_are_adjusted() {
    let doc = parse("<!DOCTYPE html><svg><clippath></clippath><lineargradient></lineargradient></svg>");
    assert!(find_element(&doc.tree, NodeId::ROOT, "clipPath").is_some());
    assert!(find_element(&doc.tree, NodeId::ROOT, "linearGradient").is_some());
}

#[test]
fn test_svg_attributes_are_adjusted() {
    let doc = parse("<!DOCTYPE html><svg viewbox='0 0 10 10' xlink:href='#a'></svg>");
    let svg = element(&doc, "svg");
    assert_eq!(svg.get_attribute("viewBox"), Some("0 0 10 10"));
    assert_eq!(svg.get_attribute("xlink:href"), Some("#a"));
}

#[test]
fn test_mathml_attributes_are_adjusted() {
    let doc = parse("<!DOCTYPE html><math definitionurl='x'></math>");
    let math = element(&doc, "math");
    assert_eq!(math.namespace, Namespace::MathMl);
    assert_eq!(math.get_attribute("definitionURL"), Some("x"));
}

#[test]
fn test_breakout_tag_leaves_foreign_content() {
    let doc = parse("<!DOCTYPE html><svg><g><p>x</p>");
    let body = doc.tree.body().expect("body");
    let children: Vec<&str> = doc
        .tree
        .children(body)
        .iter()
        .filter_map(|&id| doc.tree.as_element(id))
        .map(|data| data.tag_name.as_str())
        .collect();
    assert_eq!(children, vec!["svg", "p"]);
    assert!(element(&doc, "p").is_html());
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    let doc = parse("<!DOCTYPE html><svg><font>a</font></svg>");
    assert_eq!(element(&doc, "font").namespace, Namespace::Svg);

    let doc = parse("<!DOCTYPE html><svg><font color=red>a</font></svg>");
    assert_eq!(element(&doc, "font").namespace, Namespace::Html);
}

#[test]
fn test_cdata_section_in_svg() {
    let doc = parse("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&doc.tree, NodeId::ROOT, "svg").expect("svg");
    let child = doc.tree.first_child(svg).expect("cdata node");
    assert!(matches!(
        &doc.tree.get(child).expect("node").node_type,
        NodeType::CData(data) if data == "a<b"
    ));
}

#[test]
fn test_cdata_in_html_is_a_comment() {
    let doc = parse("<!DOCTYPE html><div><![CDATA[x]]></div>");
    let div = find_element(&doc.tree, NodeId::ROOT, "div").expect("div");
    let child = doc.tree.first_child(div).expect("comment");
    assert!(matches!(
        &doc.tree.get(child).expect("node").node_type,
        NodeType::Comment(data) if data == "[CDATA[x]]"
    ));
}

#[test]
fn test_html_integration_point() {
    let doc = parse("<!DOCTYPE html><svg><desc><b>x</b></desc></svg>");
    assert!(element(&doc, "b").is_html());
    assert_eq!(element(&doc, "desc").namespace, Namespace::Svg);
}

#[test]
fn test_mathml_text_integration_point() {
    let doc = parse("<!DOCTYPE html><math><mi><b>x</b><mglyph/></mi></math>");
    assert!(element(&doc, "b").is_html());
    assert_eq!(element(&doc, "mglyph").namespace, Namespace::MathMl);
}

#[test]
fn test_annotation_xml_with_html_encoding() {
    let doc = parse(
        r#"<!DOCTYPE html><math><annotation-xml encoding="Text/HTML"><div>x</div></annotation-xml></math>"#,
    );
    assert!(element(&doc, "div").is_html());

    let doc = parse("<!DOCTYPE html><math><annotation-xml><svg></svg></annotation-xml></math>");
    assert_eq!(element(&doc, "svg").namespace, Namespace::Svg);
}

#[test]
fn test_null_in_foreign_text_is_replaced() {
    let doc = parse("<!DOCTYPE html><svg>a\0b</svg>");
    let svg = find_element(&doc.tree, NodeId::ROOT, "svg").expect("svg");
    assert_eq!(doc.tree.text_content(svg), "a\u{FFFD}b");
}

#[test]
fn test_end_tag_matching_is_case_insensitive() {
    let doc = parse("<!DOCTYPE html><svg><foreignObject></FOREIGNOBJECT>x</svg>");
    let foreign_object = find_element(&doc.tree, NodeId::ROOT, "foreignObject").expect("element");
    assert!(doc.tree.children(foreign_object).is_empty());
}

#[test]
fn test_xmlns_mismatch_is_reported() {
    let doc = parse(r#"<!DOCTYPE html><svg xmlns="http://www.w3.org/2000/svg"></svg>"#);
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);

    let doc = parse(r#"<!DOCTYPE html><svg xmlns="http://example.com/ns"></svg>"#);
    assert_eq!(doc.errors.len(), 1);
}
