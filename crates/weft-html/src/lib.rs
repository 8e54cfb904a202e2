//! HTML tokenizer and tree builder for the weft parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data, CDATA and DOCTYPE states
//!   - Named and numeric character references
//!
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes, with scripting disabled
//!   - The adoption agency algorithm and foster parenting
//!   - Foreign content (SVG and MathML)
//!   - Fragment parsing ([§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! # Example
//!
//! ```
//! use weft_html::{ParseOptions, parse_document};
//!
//! let parsed = parse_document("<p>Hello<b>world</p>", &ParseOptions::default());
//! let body = parsed.tree.body().expect("body is always created");
//! assert_eq!(parsed.tree.text_content(body), "Helloworld");
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use weft_common::ParseError;
use weft_dom::{DomTree, NodeId};

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{
    FragmentContext, HTMLParser, InsertionMode, TreeBuilderOutput, dump_tree, print_tree,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenSource, TokenizerState};

/// Settings for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// How many parse errors to keep. Zero disables error tracking.
    pub max_errors: usize,
    /// URL that `<base href>` is resolved against.
    pub base_uri: Option<String>,
}

impl ParseOptions {
    /// Options that keep up to `max_errors` parse errors.
    #[must_use]
    pub fn tracking(max_errors: usize) -> Self {
        Self {
            max_errors,
            ..Self::default()
        }
    }
}

/// The result of [`parse_document`].
#[derive(Debug)]
pub struct ParsedDocument {
    /// The document tree; `NodeId::ROOT` is the Document node.
    pub tree: DomTree,
    /// Tokenizer and tree builder errors, in the order they were reported.
    pub errors: Vec<ParseError>,
    /// The base URI after the first `<base href>` was applied.
    pub base_uri: Option<String>,
    /// Form-associated elements mapped to the form that owns them.
    pub form_owners: HashMap<NodeId, NodeId>,
    /// Elements closed by an end tag, in close order.
    pub end_tag_closes: Vec<NodeId>,
}

/// The result of [`parse_fragment`].
#[derive(Debug)]
pub struct ParsedFragment {
    /// The tree the fragment was built in.
    pub tree: DomTree,
    /// The fragment's top-level nodes, in order.
    pub nodes: Vec<NodeId>,
    /// Tokenizer and tree builder errors.
    pub errors: Vec<ParseError>,
    /// The base URI after the first `<base href>` in the fragment was applied.
    pub base_uri: Option<String>,
    /// Elements closed by an end tag, in close order.
    pub end_tag_closes: Vec<NodeId>,
}

/// Parse a complete HTML document.
#[must_use]
pub fn parse_document(html: &str, options: &ParseOptions) -> ParsedDocument {
    let tokenizer = HTMLTokenizer::new(html, options.max_errors);
    let output = HTMLParser::new(tokenizer)
        .with_base_uri(options.base_uri.clone())
        .run();
    let errors = output.source.into_errors().into_vec();
    debug!(target: "weft::parse", "parsed document with {} error(s)", errors.len());
    ParsedDocument {
        tree: output.tree,
        errors,
        base_uri: output.base_uri,
        form_owners: output.form_owners,
        end_tag_closes: output.end_tag_closes,
    }
}

/// Parse an HTML fragment in `context`, as for `innerHTML`.
///
/// Without a context the input is parsed like a document and every child of
/// the document is returned.
#[must_use]
pub fn parse_fragment(
    html: &str,
    context: Option<&FragmentContext>,
    options: &ParseOptions,
) -> ParsedFragment {
    let tokenizer = HTMLTokenizer::new(html, options.max_errors);
    let (output, nodes) = HTMLParser::for_fragment(tokenizer, context)
        .with_base_uri(options.base_uri.clone())
        .run_fragment();
    let errors = output.source.into_errors().into_vec();
    debug!(
        target: "weft::parse",
        "parsed fragment into {} node(s) with {} error(s)",
        nodes.len(),
        errors.len()
    );
    ParsedFragment {
        tree: output.tree,
        nodes,
        errors,
        base_uri: output.base_uri,
        end_tag_closes: output.end_tag_closes,
    }
}
