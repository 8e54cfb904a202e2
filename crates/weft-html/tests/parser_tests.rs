//! Integration tests for the HTML tree builder.

use weft_dom::serialize::inner_html;
use weft_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use weft_html::{ParseOptions, ParsedDocument, parse_document};

/// Helper to parse HTML, keeping up to 100 parse errors
fn parse(html: &str) -> ParsedDocument {
    parse_document(html, &ParseOptions::tracking(100))
}

/// Helper to serialize the children of the body
fn body_html(html: &str) -> String {
    let doc = parse(html);
    let body = doc.tree.body().expect("body exists");
    inner_html(&doc.tree, body)
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

/// Helper to collect every element with a tag name, in tree order
fn find_all(tree: &DomTree, from: NodeId, tag: &str, out: &mut Vec<NodeId>) {
    if tree.as_element(from).is_some_and(|data| data.tag_name == tag) {
        out.push(from);
    }
    for &child in tree.children(from) {
        find_all(tree, child, tag, out);
    }
}

fn tag_name(tree: &DomTree, id: NodeId) -> &str {
    tree.as_element(id).map_or("", |data| data.tag_name.as_str())
}

#[test]
fn test_document_structure() {
    let doc = parse("<!DOCTYPE html><title>T</title><p>x");
    let tree = &doc.tree;

    let root_children = tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 2);
    assert!(matches!(
        &tree.get(root_children[0]).expect("doctype").node_type,
        NodeType::Doctype { name, .. } if name == "html"
    ));

    let html = tree.document_element().expect("html element");
    let names: Vec<&str> = tree
        .children(html)
        .iter()
        .map(|&id| tag_name(tree, id))
        .collect();
    assert_eq!(names, vec!["head", "body"]);

    let title = find_element(tree, html, "title").expect("title");
    assert_eq!(tree.text_content(title), "T");
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);
}

#[test]
fn test_empty_input_builds_skeleton() {
    let doc = parse("");
    let html = doc.tree.document_element().expect("html element");
    assert_eq!(doc.tree.children(html).len(), 2);
    assert!(doc.tree.body().is_some());
}

#[test]
fn test_missing_doctype_is_quirks() {
    let doc = parse("<p>x");
    assert_eq!(doc.tree.quirks_mode(), QuirksMode::Quirks);
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_legacy_doctype_is_limited_quirks() {
    let doc = parse(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    );
    assert_eq!(doc.tree.quirks_mode(), QuirksMode::LimitedQuirks);
}

#[test]
fn test_error_message_names_token_and_mode() {
    let doc = parse("<!DOCTYPE html></foo>");
    assert_eq!(doc.errors.len(), 1);
    assert_eq!(
        doc.errors[0].message,
        "Unexpected EndTag token [</foo>] when in state [BeforeHtml]"
    );
}

#[test]
fn test_error_limit_is_respected() {
    let doc = parse_document("</a></b></c></d>", &ParseOptions::tracking(2));
    assert_eq!(doc.errors.len(), 2);

    let doc = parse_document("</a></b></c></d>", &ParseOptions::default());
    assert!(doc.errors.is_empty());
}

#[test]
fn test_self_closing_unknown_tag_has_no_children() {
    let doc = parse("<!DOCTYPE html><foo />bar");
    let body = doc.tree.body().expect("body");
    assert_eq!(inner_html(&doc.tree, body), "<foo />bar");
    let foo = find_element(&doc.tree, body, "foo").expect("foo");
    assert!(doc.tree.as_element(foo).is_some_and(|data| data.self_closing));
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);
}

#[test]
fn test_self_closing_known_non_void_tag_is_an_error() {
    let doc = parse("<!DOCTYPE html><div/>x");
    let body = doc.tree.body().expect("body");
    assert_eq!(inner_html(&doc.tree, body), "<div></div>x");
    assert_eq!(doc.errors.len(), 1);
    let div = find_element(&doc.tree, body, "div").expect("div");
    assert!(doc.tree.as_element(div).is_some_and(|data| !data.self_closing));
}

#[test]
fn test_void_elements() {
    assert_eq!(
        body_html("<!DOCTYPE html><p>a<br>b<img src=x>c"),
        "<p>a<br>b<img src=\"x\">c</p>"
    );
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let doc = parse(r#"<!DOCTYPE html><a href="1" href="2">x</a>"#);
    let body = doc.tree.body().expect("body");
    assert_eq!(inner_html(&doc.tree, body), "<a href=\"1\">x</a>");
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_formatting_element_spanning_paragraph() {
    assert_eq!(
        body_html("<!DOCTYPE html><b>1<p>2</p>3</b>"),
        "<b>1<p>2</p>3</b>"
    );
}

#[test]
fn test_misnested_formatting_is_reconstructed() {
    let doc = parse("<!DOCTYPE html><b>1<p>2</b>3</p>");
    let body = doc.tree.body().expect("body");
    assert_eq!(
        inner_html(&doc.tree, body),
        "<b>1</b><p><b>2</b>3</p>"
    );

    let mut bold = Vec::new();
    find_all(&doc.tree, body, "b", &mut bold);
    assert_eq!(bold.len(), 2);
    assert_eq!(doc.tree.text_content(bold[0]), "1");
    assert_eq!(doc.tree.text_content(bold[1]), "2");
}

#[test]
fn test_adoption_agency_inline_misnesting() {
    assert_eq!(
        body_html("<!DOCTYPE html><b><i>x</b>y</i>"),
        "<b><i>x</i></b><i>y</i>"
    );
}

#[test]
fn test_adoption_agency_nested_anchor() {
    assert_eq!(
        body_html("<!DOCTYPE html><a><p>X<a>Y</a>Z</p></a>"),
        "<a></a><p><a>X</a><a>Y</a>Z</p>"
    );
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    assert_eq!(
        body_html("<!DOCTYPE html><p><b><b><b><b>x</p>y"),
        "<p><b><b><b><b>x</b></b></b></b></p><b><b><b>y</b></b></b>"
    );
}

#[test]
fn test_noahs_ark_distinguishes_attributes() {
    assert_eq!(
        body_html(
            r#"<!DOCTYPE html><p><b class=a><b class=b><b class=a><b class=b>x</p>y"#
        ),
        concat!(
            r#"<p><b class="a"><b class="b"><b class="a"><b class="b">x</b></b></b></b></p>"#,
            r#"<b class="a"><b class="b"><b class="a"><b class="b">y</b></b></b></b>"#
        )
    );
}

#[test]
fn test_foster_parenting_element() {
    assert_eq!(
        body_html("<!DOCTYPE html><table><div>x</div></table>"),
        "<div>x</div><table></table>"
    );
}

#[test]
fn test_foster_parenting_text() {
    assert_eq!(
        body_html("<!DOCTYPE html><table>a<tr><td>b"),
        "a<table><tbody><tr><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn test_table_whitespace_stays_in_table() {
    assert_eq!(
        body_html("<!DOCTYPE html><table> <tr><td>x</td></tr></table>"),
        "<table> <tbody><tr><td>x</td></tr></tbody></table>"
    );
}

#[test]
fn test_table_implied_structure() {
    assert_eq!(
        body_html("<!DOCTYPE html><table><td>a<td>b<tr><th>c</table>"),
        "<table><tbody><tr><td>a</td><td>b</td></tr><tr><th>c</th></tr></tbody></table>"
    );
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        body_html("<!DOCTYPE html><table><caption>cap<col><tr><td>x</table>"),
        "<table><caption>cap</caption><colgroup><col></colgroup><tbody><tr><td>x</td></tr></tbody></table>"
    );
}

#[test]
fn test_paragraph_closed_by_block() {
    assert_eq!(
        body_html("<!DOCTYPE html><p>one<div>two</div>"),
        "<p>one</p><div>two</div>"
    );
}

#[test]
fn test_stray_paragraph_end_inside_button() {
    // </p> does not see the outer <p> past the button boundary.
    assert_eq!(
        body_html("<!DOCTYPE html><p><button></p>"),
        "<p><button><p></p></button></p>"
    );
}

#[test]
fn test_button_end_closes_inner_paragraph() {
    let doc = parse("<!DOCTYPE html><button><p></button>x");
    let body = doc.tree.body().expect("body");
    assert_eq!(
        inner_html(&doc.tree, body),
        "<button><p></p></button>x"
    );
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        body_html("<!DOCTYPE html><ul><li>a<li>b</ul>"),
        "<ul><li>a</li><li>b</li></ul>"
    );
    assert_eq!(
        body_html("<!DOCTYPE html><dl><dt>a<dd>b<dt>c</dl>"),
        "<dl><dt>a</dt><dd>b</dd><dt>c</dt></dl>"
    );
}

#[test]
fn test_headings_do_not_nest() {
    assert_eq!(
        body_html("<!DOCTYPE html><h1>a<h2>b</h2>"),
        "<h1>a</h1><h2>b</h2>"
    );
}

#[test]
fn test_select_options() {
    assert_eq!(
        body_html("<!DOCTYPE html><select><option>a<option>b</select>"),
        "<select><option>a</option><option>b</option></select>"
    );
}

#[test]
fn test_select_in_table_breaks_out() {
    assert_eq!(
        body_html("<!DOCTYPE html><table><tr><td><select><option>a<td>b</table>"),
        "<table><tbody><tr><td><select><option>a</option></select></td><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn test_title_is_rcdata() {
    let doc = parse("<!DOCTYPE html><title>a<b>&amp;</title>");
    let title = find_element(&doc.tree, NodeId::ROOT, "title").expect("title");
    assert_eq!(doc.tree.text_content(title), "a<b>&");
}

#[test]
fn test_script_content_is_raw_data() {
    let doc = parse("<!DOCTYPE html><script>if (a<b) x();</script>");
    let script = find_element(&doc.tree, NodeId::ROOT, "script").expect("script");
    let child = doc.tree.first_child(script).expect("script text");
    assert!(matches!(
        &doc.tree.get(child).expect("node").node_type,
        NodeType::Data(data) if data == "if (a<b) x();"
    ));
}

#[test]
fn test_textarea_drops_leading_newline() {
    let doc = parse("<!DOCTYPE html><textarea>\nfoo</textarea>");
    let textarea = find_element(&doc.tree, NodeId::ROOT, "textarea").expect("textarea");
    assert_eq!(doc.tree.text_content(textarea), "foo");
}

#[test]
fn test_pre_drops_leading_newline() {
    let doc = parse("<!DOCTYPE html><pre>\n\nx</pre>");
    let pre = find_element(&doc.tree, NodeId::ROOT, "pre").expect("pre");
    assert_eq!(doc.tree.text_content(pre), "\nx");
}

#[test]
fn test_plaintext_consumes_rest() {
    assert_eq!(
        body_html("<!DOCTYPE html><plaintext><b>x</plaintext>"),
        "<plaintext><b>x</plaintext></plaintext>"
    );
}

#[test]
fn test_noscript_in_head_with_scripting_disabled() {
    let doc = parse("<!DOCTYPE html><head><noscript><link rel=x></noscript></head>");
    let head = find_element(&doc.tree, NodeId::ROOT, "head").expect("head");
    let noscript = find_element(&doc.tree, head, "noscript").expect("noscript in head");
    assert!(find_element(&doc.tree, noscript, "link").is_some());
}

#[test]
fn test_frameset_document() {
    let doc = parse("<!DOCTYPE html><frameset><frame></frameset>");
    let body = doc.tree.body().expect("frameset acts as body");
    assert_eq!(tag_name(&doc.tree, body), "frameset");
    assert_eq!(inner_html(&doc.tree, body), "<frame>");
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);
}

#[test]
fn test_comment_after_html_goes_to_document() {
    let doc = parse("<!DOCTYPE html><html></html><!--c-->");
    let last = doc.tree.last_child(NodeId::ROOT).expect("last child");
    assert!(matches!(
        &doc.tree.get(last).expect("node").node_type,
        NodeType::Comment(data) if data == "c"
    ));
}

#[test]
fn test_html_attributes_are_merged() {
    let doc = parse(r#"<!DOCTYPE html><html lang="en"><body><html lang="fr" dir="rtl">"#);
    let html = doc.tree.document_element().expect("html");
    let data = doc.tree.as_element(html).expect("element");
    assert_eq!(data.get_attribute("lang"), Some("en"));
    assert_eq!(data.get_attribute("dir"), Some("rtl"));
}

#[test]
fn test_template_contents() {
    let doc = parse("<!DOCTYPE html><template><tr><td>x</td></tr></template>");
    let head = find_element(&doc.tree, NodeId::ROOT, "head").expect("head");
    assert_eq!(
        inner_html(&doc.tree, head),
        "<template><tr><td>x</td></tr></template>"
    );
    assert!(doc.errors.is_empty(), "{:?}", doc.errors);
}

#[test]
fn test_unclosed_template_at_eof() {
    let doc = parse("<!DOCTYPE html><body><template><div>x");
    let body = doc.tree.body().expect("body");
    assert_eq!(
        inner_html(&doc.tree, body),
        "<template><div>x</div></template>"
    );
    assert_eq!(doc.errors.len(), 1);
}

#[test]
fn test_first_base_href_wins() {
    let options = ParseOptions {
        max_errors: 0,
        base_uri: Some("http://example.com/dir/page.html".to_string()),
    };
    let doc = parse_document(r#"<base href="../a/"><base href="/b/">"#, &options);
    assert_eq!(doc.base_uri.as_deref(), Some("http://example.com/a/"));
}

#[test]
fn test_base_href_without_parse_base() {
    let doc = parse(r#"<base href="http://x.test/path/">"#);
    assert_eq!(doc.base_uri.as_deref(), Some("http://x.test/path/"));

    let doc = parse(r#"<base href="relative/">"#);
    assert_eq!(doc.base_uri, None);
}

#[test]
fn test_form_controls_are_associated() {
    let doc = parse(
        "<!DOCTYPE html><form><input name=a><select></select></form><input name=b>",
    );
    let form = find_element(&doc.tree, NodeId::ROOT, "form").expect("form");
    let mut inputs = Vec::new();
    find_all(&doc.tree, NodeId::ROOT, "input", &mut inputs);
    let select = find_element(&doc.tree, NodeId::ROOT, "select").expect("select");

    assert_eq!(doc.form_owners.get(&inputs[0]), Some(&form));
    assert_eq!(doc.form_owners.get(&select), Some(&form));
    assert_eq!(doc.form_owners.get(&inputs[1]), None);
}

#[test]
fn test_template_blocks_form_association() {
    let doc = parse("<!DOCTYPE html><form><template><input></template></form>");
    let input = find_element(&doc.tree, NodeId::ROOT, "input").expect("input");
    assert!(!doc.form_owners.contains_key(&input));
}

#[test]
fn test_nested_form_is_ignored() {
    let doc = parse("<!DOCTYPE html><form><form><input></form>");
    let mut forms = Vec::new();
    find_all(&doc.tree, NodeId::ROOT, "form", &mut forms);
    assert_eq!(forms.len(), 1);
}

#[test]
fn test_svg_in_body() {
    let doc = parse("<!DOCTYPE html><svg viewbox='0 0 1 1'><foreignobject><p>x</p></foreignobject></svg>");
    let svg = find_element(&doc.tree, NodeId::ROOT, "svg").expect("svg");
    let data = doc.tree.as_element(svg).expect("element");
    assert_eq!(data.namespace, Namespace::Svg);
    assert_eq!(data.get_attribute("viewBox"), Some("0 0 1 1"));

    let foreign_object = find_element(&doc.tree, svg, "foreignObject").expect("foreignObject");
    let p = find_element(&doc.tree, foreign_object, "p").expect("p");
    assert!(doc.tree.as_element(p).expect("element").is_html());
}

#[test]
fn test_end_tag_closes_are_recorded() {
    let doc = parse("<!DOCTYPE html><div><p>a<p>b<span>c</span></div><em>d");
    let names: Vec<&str> = doc
        .end_tag_closes
        .iter()
        .filter_map(|&node| doc.tree.as_element(node))
        .map(|data| data.tag_name.as_str())
        .collect();
    // Both paragraphs close implicitly, and end-of-file leaves em open.
    assert_eq!(names, ["span", "div"]);
}

#[test]
fn test_end_tag_close_through_synthetic_paragraph() {
    let doc = parse("<!DOCTYPE html><body></p>");
    let body = doc.tree.body().expect("body");
    let p = find_element(&doc.tree, body, "p").expect("p");
    assert_eq!(doc.end_tag_closes, [p]);
}

#[test]
fn test_scope_search_stops_at_depth_limit() {
    // 101 spans put the p past the search window, so it counts as absent and
    // the end tag opens and closes a new empty p inside the innermost span.
    let doc = parse(&format!("<!DOCTYPE html><p>{}</p>", "<span>".repeat(101)));
    let body = doc.tree.body().expect("body");
    let mut paragraphs = Vec::new();
    find_all(&doc.tree, body, "p", &mut paragraphs);
    assert_eq!(paragraphs.len(), 2);
    let parent = doc.tree.parent(paragraphs[1]).expect("parent");
    assert_eq!(doc.tree.as_element(parent).expect("span").tag_name, "span");
    assert!(doc.tree.children(paragraphs[1]).is_empty());
    assert!(doc.errors.iter().any(|error| {
        error.message == "Unexpected EndTag token [</p>] when in state [InBody]"
    }));

    // Within the window the end tag closes the outer p.
    let doc = parse(&format!("<!DOCTYPE html><p>{}</p>x", "<span>".repeat(99)));
    let body = doc.tree.body().expect("body");
    let mut paragraphs = Vec::new();
    find_all(&doc.tree, body, "p", &mut paragraphs);
    assert_eq!(paragraphs.len(), 1);
    let last = *doc.tree.children(body).last().expect("trailing text");
    assert_eq!(doc.tree.as_text(last), Some("x"));
}
