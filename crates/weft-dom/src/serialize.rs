//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a subtree back into markup. Re-parsing the output yields a
//! structurally equivalent tree.

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Serialize `node` including its own start and end tags.
#[must_use]
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, node, &mut out);
    out
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#html-fragment-serialisation-algorithm)
///
/// Serialize only the children of `node`.
#[must_use]
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    serialize_children(tree, node, &mut out);
    out
}

fn serialize_children(tree: &DomTree, node: NodeId, out: &mut String) {
    for &child in tree.children(node) {
        serialize_node(tree, child, out);
    }
}

fn serialize_node(tree: &DomTree, node: NodeId, out: &mut String) {
    let Some(n) = tree.get(node) else {
        return;
    };
    match &n.node_type {
        NodeType::Document => serialize_children(tree, node, out),
        NodeType::Doctype { name, .. } => {
            // "<!DOCTYPE" followed by a space, the doctype name, and ">"
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeType::Element(data) => serialize_element(tree, node, data, out),
        NodeType::Text(text) => {
            if is_raw_text_parent(tree, node) {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeType::Data(data) => out.push_str(data),
        NodeType::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}

fn serialize_element(tree: &DomTree, node: NodeId, data: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&data.tag_name);
    for (name, value) in &data.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }

    let children = tree.children(node);
    if data.self_closing && children.is_empty() && !data.is_void() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    // "If current node is an element in the HTML namespace and is a void
    // element, then continue on to the next child node at this point."
    if data.is_void() {
        return;
    }

    // "If current node is a pre, textarea, or listing element, and the first
    // child node of the element, if any, is a Text node whose character data
    // has as its first character a U+000A LINE FEED (LF) character, then
    // append a U+000A LINE FEED (LF) character."
    if data.is_html()
        && matches!(data.tag_name.as_str(), "pre" | "textarea" | "listing")
        && let Some(first) = children.first()
        && tree.as_text(*first).is_some_and(|t| t.starts_with('\n'))
    {
        out.push('\n');
    }

    serialize_children(tree, node, out);
    out.push_str("</");
    out.push_str(&data.tag_name);
    out.push('>');
}

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element, or a noscript element if scripting is
/// enabled for the node, then append the value of current node's data
/// literally."
///
/// Scripting is always disabled here, so `noscript` text is escaped.
fn is_raw_text_parent(tree: &DomTree, node: NodeId) -> bool {
    tree.parent(node)
        .and_then(|p| tree.as_element(p))
        .is_some_and(|e| {
            e.is_html()
                && matches!(
                    e.tag_name.as_str(),
                    "style"
                        | "script"
                        | "xmp"
                        | "iframe"
                        | "noembed"
                        | "noframes"
                        | "plaintext"
                )
        })
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
