//! Tests for HTML serialization.

use weft_dom::serialize::{inner_html, outer_html};
use weft_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let attrs = attrs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let id = tree.alloc(NodeType::Element(ElementData::html(tag, attrs)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
    id
}

#[test]
fn test_void_elements_have_no_end_tag() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", &[]);
    let _ = element(&mut tree, p, "br", &[]);
    let _ = element(&mut tree, p, "img", &[("src", "a.png")]);

    assert_eq!(outer_html(&tree, p), "<p><br><img src=\"a.png\"></p>");
}

#[test]
fn test_text_and_attributes_are_escaped() {
    let mut tree = DomTree::new();
    let a = element(&mut tree, NodeId::ROOT, "a", &[("title", "say \"hi\" & <go>")]);
    let _ = text(&mut tree, a, "1 < 2 & 3 > 2\u{00A0}");

    assert_eq!(
        outer_html(&tree, a),
        "<a title=\"say &quot;hi&quot; &amp; <go>\">1 &lt; 2 &amp; 3 &gt; 2&nbsp;</a>"
    );
}

#[test]
fn test_script_data_is_not_escaped() {
    let mut tree = DomTree::new();
    let script = element(&mut tree, NodeId::ROOT, "script", &[]);
    let data = tree.alloc(NodeType::Data("if (a < b && c) {}".to_string()));
    tree.append_child(script, data);

    assert_eq!(inner_html(&tree, script), "if (a < b && c) {}");
}

#[test]
fn test_pre_leading_newline_is_preserved() {
    let mut tree = DomTree::new();
    let pre = element(&mut tree, NodeId::ROOT, "pre", &[]);
    let _ = text(&mut tree, pre, "\nline");

    assert_eq!(outer_html(&tree, pre), "<pre>\n\nline</pre>");
}

#[test]
fn test_self_closed_element_keeps_short_form() {
    let mut tree = DomTree::new();
    let svg = tree.alloc(NodeType::Element(ElementData {
        tag_name: "svg".to_string(),
        namespace: Namespace::Svg,
        attrs: Vec::new(),
        self_closing: false,
    }));
    tree.append_child(NodeId::ROOT, svg);
    let circle = tree.alloc(NodeType::Element(ElementData {
        tag_name: "circle".to_string(),
        namespace: Namespace::Svg,
        attrs: vec![("r".to_string(), "4".to_string())],
        self_closing: true,
    }));
    tree.append_child(svg, circle);

    assert_eq!(outer_html(&tree, svg), "<svg><circle r=\"4\" /></svg>");

    let empty = tree.alloc(NodeType::Element(ElementData {
        tag_name: "rect".to_string(),
        namespace: Namespace::Svg,
        attrs: Vec::new(),
        self_closing: false,
    }));
    tree.append_child(svg, empty);
    assert_eq!(
        outer_html(&tree, svg),
        "<svg><circle r=\"4\" /><rect></rect></svg>"
    );
}

#[test]
fn test_noscript_text_is_escaped() {
    let mut tree = DomTree::new();
    let noscript = element(&mut tree, NodeId::ROOT, "noscript", &[]);
    let _ = text(&mut tree, noscript, "<b>x");

    assert_eq!(outer_html(&tree, noscript), "<noscript>&lt;b&gt;x</noscript>");
}

#[test]
fn test_document_serializes_doctype_and_comments() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Doctype {
        name: "html".to_string(),
        public_id: String::new(),
        system_id: String::new(),
    });
    tree.append_child(NodeId::ROOT, doctype);
    let comment = tree.alloc(NodeType::Comment(" hi ".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let _ = element(&mut tree, NodeId::ROOT, "html", &[]);

    assert_eq!(
        outer_html(&tree, NodeId::ROOT),
        "<!DOCTYPE html><!-- hi --><html></html>"
    );
}

#[test]
fn test_tree_serializes_to_json() {
    let mut tree = DomTree::new();
    let _ = element(&mut tree, NodeId::ROOT, "html", &[("lang", "en")]);

    let json = serde_json::to_value(&tree).expect("tree serializes");
    assert_eq!(json["nodes"][1]["node_type"]["Element"]["tag_name"], "html");
    assert_eq!(json["quirks_mode"], "NoQuirks");
}
