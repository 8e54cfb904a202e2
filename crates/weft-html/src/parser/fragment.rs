//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use log::trace;
use serde::{Deserialize, Serialize};
use weft_dom::{Namespace, NodeId, QuirksMode};

use super::core::{HTMLParser, InsertionMode, TreeBuilderOutput};
use crate::tokenizer::{Attribute, TokenSource, TokenizerState};

/// The element a fragment is parsed in, as in `innerHTML` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentContext {
    /// Local name of the context element.
    pub tag_name: String,
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Quirks mode of the document that owns the context element.
    pub quirks_mode: QuirksMode,
    /// Whether the context element is, or has an ancestor that is, a `form`.
    pub form_ancestor: bool,
    /// The `encoding` attribute of a MathML `annotation-xml` context.
    pub encoding: Option<String>,
}

impl FragmentContext {
    /// An HTML context element named `tag_name`.
    #[must_use]
    pub fn html(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// A context element named `tag_name` in `namespace`.
    #[must_use]
    pub fn foreign(tag_name: &str, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace,
            ..Self::default()
        }
    }

    /// The tokenizer state the fragment starts in.
    ///
    /// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    /// STEP 4: "Set the state of the HTML parser's tokenization stage as
    ///          follows, switching on the context element"
    #[must_use]
    pub fn initial_tokenizer_state(&self) -> TokenizerState {
        if self.namespace != Namespace::Html {
            return TokenizerState::Data;
        }
        match self.tag_name.as_str() {
            // "title", "textarea": "Switch the tokenizer to the RCDATA state."
            "title" | "textarea" => TokenizerState::RCDATA,
            // "style", "xmp", "iframe", "noembed", "noframes": "Switch the
            //  tokenizer to the RAWTEXT state."
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RAWTEXT,
            // "script": "Switch the tokenizer to the script data state."
            "script" => TokenizerState::ScriptData,
            // "plaintext": "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => TokenizerState::PLAINTEXT,
            // "Any other element": "Leave the tokenizer in the data state."
            _ => TokenizerState::Data,
        }
    }
}

impl Default for FragmentContext {
    fn default() -> Self {
        Self {
            tag_name: "body".to_string(),
            namespace: Namespace::Html,
            quirks_mode: QuirksMode::NoQuirks,
            form_ancestor: false,
            encoding: None,
        }
    }
}

impl<S: TokenSource> HTMLParser<S> {
    /// A parser set up for the HTML fragment parsing algorithm.
    ///
    /// Without a context the fragment is parsed from the "initial" insertion
    /// mode like a document, and the result is every child of the document.
    #[must_use]
    pub fn for_fragment(source: S, context: Option<&FragmentContext>) -> Self {
        let mut parser = Self::new(source);
        parser.fragment_parsing = true;

        let Some(context) = context else {
            return parser;
        };
        trace!(target: "weft::parser", "fragment parse in <{}>", context.tag_name);

        // STEP 3: "If the context element's node document is in quirks mode,
        //          then let the Document be in quirks mode."
        parser.tree.set_quirks_mode(context.quirks_mode);

        // STEP 4: tokenizer state for the context element.
        parser
            .source
            .request_state(context.initial_tokenizer_state());

        // The context element stays detached; only the insertion mode and
        // foreign content checks look at it.
        let attributes: Vec<Attribute> = context
            .encoding
            .iter()
            .map(|encoding| Attribute::new("encoding", encoding.clone()))
            .collect();
        let context_element = parser.create_element(&context.tag_name, context.namespace, &attributes);

        // STEP 5: "Let root be the result of creating an element given
        //          document, "html", and the HTML namespace."
        // STEP 6: "Append root to document."
        // STEP 7: "Set up the HTML parser's stack of open elements so that it
        //          contains just the single element root."
        let root = parser.create_element("html", Namespace::Html, &[]);
        let document = parser.tree.root();
        parser.tree.append_child(document, root);
        parser.stack_of_open_elements.push(root);

        // STEP 8: "If the context element is a template element, then push "in
        //          template" onto the stack of template insertion modes so
        //          that it is the new current template insertion mode."
        if context.namespace == Namespace::Html && context.tag_name == "template" {
            parser
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        // STEP 10: "Reset the parser's insertion mode appropriately."
        parser.context_element = Some(context_element);
        parser.reset_insertion_mode();

        // STEP 11: "Set the HTML parser's form element pointer to the nearest
        //           node to the context element that is a form element (going
        //           straight up the ancestor chain, and including the element
        //           itself, if it is a form element), if any."
        if context.form_ancestor {
            let form = parser.create_element("form", Namespace::Html, &[]);
            parser.form_element_pointer = Some(form);
        }

        parser
    }

    /// Run a fragment parse to completion and collect the fragment's nodes.
    ///
    /// With a context element, content that ended up beside the synthetic
    /// root is moved to the end of the root, and the result is the root's
    /// children. Without one, the result is the document's children.
    #[must_use]
    pub fn run_fragment(self) -> (TreeBuilderOutput<S>, Vec<NodeId>) {
        let has_context = self.context_element.is_some();
        let mut output = self.run();
        let tree = &mut output.tree;

        let nodes = match tree.document_element().filter(|_| has_context) {
            Some(root) => {
                for sibling in tree.sibling_nodes(root) {
                    tree.append_child(root, sibling);
                }
                tree.children(root).to_vec()
            }
            None => tree.children(tree.root()).to_vec(),
        };
        (output, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_tokenizer_state() {
        assert_eq!(
            FragmentContext::html("textarea").initial_tokenizer_state(),
            TokenizerState::RCDATA
        );
        assert_eq!(
            FragmentContext::html("STYLE").initial_tokenizer_state(),
            TokenizerState::RAWTEXT
        );
        assert_eq!(
            FragmentContext::foreign("title", Namespace::Svg).initial_tokenizer_state(),
            TokenizerState::Data
        );
        assert_eq!(
            FragmentContext::html("div").initial_tokenizer_state(),
            TokenizerState::Data
        );
    }
}
