//! Property tests: arbitrary tag soup always yields a consistent tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use weft_dom::{DomTree, NodeId};
use weft_html::{FragmentContext, ParseOptions, parse_document, parse_fragment};

/// Markup stitched together from pieces that exercise the tricky modes.
#[derive(Debug, Clone)]
struct Markup(String);

const PIECES: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<table>", "</table>",
    "<tr>", "<td>", "</td>", "<caption>", "<select>", "<option>", "</select>", "<template>",
    "</template>", "<svg>", "</svg>", "<math>", "<mi>", "<foreignObject>", "<div>", "</div>",
    "<li>", "<button>", "</button>", "<form>", "</form>", "<input>", "<frameset>", "<title>",
    "<textarea>", "<script>", "</script>", "<![CDATA[x]]>", "<!--c-->", "<!DOCTYPE html>",
    "</body>", "</html>", "<head>", "<body>", "<br/>", "<foo/>", "text", " ", "\n", "&amp;",
    "\0",
];

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        let markup = (0..len)
            .filter_map(|_| g.choose(PIECES).copied())
            .collect::<String>();
        Self(markup)
    }
}

/// Every child points back at its parent and no node appears twice.
fn is_consistent(tree: &DomTree, node: NodeId, seen: &mut Vec<NodeId>) -> bool {
    if seen.contains(&node) {
        return false;
    }
    seen.push(node);
    tree.children(node)
        .iter()
        .all(|&child| tree.parent(child) == Some(node) && is_consistent(tree, child, seen))
}

#[quickcheck]
fn prop_document_tree_is_consistent(markup: Markup) -> bool {
    let doc = parse_document(&markup.0, &ParseOptions::tracking(10));
    let html = doc.tree.document_element();
    doc.errors.len() <= 10
        && html.is_some()
        && is_consistent(&doc.tree, NodeId::ROOT, &mut Vec::new())
}

#[quickcheck]
fn prop_fragment_nodes_belong_to_root(markup: Markup) -> bool {
    let context = FragmentContext::html("td");
    let parsed = parse_fragment(&markup.0, Some(&context), &ParseOptions::default());
    let Some(root) = parsed.tree.document_element() else {
        return false;
    };
    parsed.tree.children(NodeId::ROOT) == [root]
        && parsed
            .nodes
            .iter()
            .all(|&node| parsed.tree.parent(node) == Some(root))
}
