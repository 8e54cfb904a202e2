use std::collections::HashMap;

use log::trace;
use strum_macros::Display;

use weft_common::url::resolve_url;
use weft_dom::{DomTree, ElementData, Namespace, NodeId, NodeType, is_void_element};

use super::active_formatting::{ActiveFormattingElement, ActiveFormattingElements};
use super::foreign_content::{is_html_integration_point, is_mathml_text_integration_point};
use super::open_elements::{MAX_QUEUE_DEPTH, StackOfOpenElements};
use super::tags::{is_data_content, is_form_listed, is_known_tag, is_special};
use crate::tokenizer::{Attribute, Token, TokenSource, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

impl InsertionMode {
    /// Modes whose rules treat leading whitespace in a character token
    /// differently from the rest. Such tokens are split before dispatch.
    const fn splits_leading_whitespace(self) -> bool {
        matches!(
            self,
            Self::Initial
                | Self::BeforeHtml
                | Self::BeforeHead
                | Self::InHead
                | Self::InHeadNoscript
                | Self::AfterHead
                | Self::InColumnGroup
                | Self::AfterBody
                | Self::AfterAfterBody
        )
    }
}

/// Elements whose content is redirected when foster parenting is on.
///
/// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
/// "If foster parenting is enabled and target is a table, tbody, tfoot, thead,
/// or tr element"
const FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// True when every character of `data` is ASCII whitespace.
pub(super) fn is_all_whitespace(data: &str) -> bool {
    data.chars().all(is_whitespace)
}

/// What the tree builder hands back when the token stream is exhausted.
#[derive(Debug)]
pub struct TreeBuilderOutput<S> {
    /// The constructed tree.
    pub tree: DomTree,
    /// The token source, holding the shared error sink.
    pub source: S,
    /// The base URI after any `<base href>` was applied.
    pub base_uri: Option<String>,
    /// Form-associated elements mapped to their form owner.
    pub form_owners: HashMap<NodeId, NodeId>,
    /// Elements closed by an end tag, in the order they were closed. Elements
    /// closed implicitly (by a start tag or end-of-file) are not listed.
    pub end_tag_closes: Vec<NodeId>,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from tokens pulled out of a
/// [`TokenSource`], steering the source's state as it goes.
#[allow(clippy::struct_excessive_bools)]
pub struct HTMLParser<S: TokenSource> {
    pub(super) source: S,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// "the original insertion mode", saved when switching to "text" or
    /// "in table text".
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// "The current template insertion mode is the insertion mode that was
    /// most recently pushed onto the stack of template insertion modes."
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: StackOfOpenElements,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: ActiveFormattingElements,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    /// `NodeId::ROOT` is the Document node.
    pub(super) tree: DomTree,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "pending table character tokens"
    pub(super) pending_table_character_tokens: Vec<String>,

    /// Drop one leading LF from the next character token (`pre`, `listing`,
    /// `textarea`).
    pub(super) skip_next_newline: bool,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context)
    ///
    /// The detached context element when parsing a fragment.
    pub(super) context_element: Option<NodeId>,

    /// Set for every fragment parse, with or without a context element.
    pub(super) fragment_parsing: bool,

    pub(super) base_uri: Option<String>,

    /// Set once the first usable `<base href>` has been applied.
    pub(super) base_uri_set_from_doc: bool,

    pub(super) form_owners: HashMap<NodeId, NodeId>,

    /// True while the token being handled is an end tag.
    pub(super) handling_end_tag: bool,

    pub(super) end_tag_closes: Vec<NodeId>,

    pub(super) stopped: bool,
}

impl<S: TokenSource> HTMLParser<S> {
    /// Create a parser that pulls from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT
        Self {
            source,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: StackOfOpenElements::new(),
            active_formatting_elements: ActiveFormattingElements::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            tree: DomTree::new(),
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: Vec::new(),
            skip_next_newline: false,
            context_element: None,
            fragment_parsing: false,
            base_uri: None,
            base_uri_set_from_doc: false,
            form_owners: HashMap::new(),
            handling_end_tag: false,
            end_tag_closes: Vec::new(),
            stopped: false,
        }
    }

    /// Resolve `<base href>` against `base_uri`.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Option<String>) -> Self {
        self.base_uri = base_uri;
        self
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Run the parser until the end-of-file token has been processed.
    #[must_use]
    pub fn run(mut self) -> TreeBuilderOutput<S> {
        while !self.stopped {
            let mut token = self.source.next_token();

            // "If the next token is a U+000A LINE FEED (LF) character token,
            //  then ignore that token and move on to the next one."
            if std::mem::take(&mut self.skip_next_newline)
                && let Token::Character { data, .. } = &mut token
                && data.starts_with('\n')
            {
                let _ = data.remove(0);
                if data.is_empty() {
                    continue;
                }
            }

            let is_eof = token.is_eof();
            self.dispatch(&token);

            let foreign = self
                .adjusted_current_node()
                .and_then(|id| self.tree.as_element(id))
                .is_some_and(|element| !element.is_html());
            self.source.set_cdata_allowed(foreign);

            if is_eof {
                break;
            }
        }
        TreeBuilderOutput {
            tree: self.tree,
            source: self.source,
            base_uri: self.base_uri,
            form_owners: self.form_owners,
            end_tag_closes: self.end_tag_closes,
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the tree
    /// construction dispatcher"
    pub(super) fn dispatch(&mut self, token: &Token) {
        if self.dispatch_to_insertion_mode(token) {
            self.process_token(token);
        } else {
            let outer = self.begin_token(token);
            self.handle_foreign_content(token);
            self.handling_end_tag = outer;
        }
    }

    /// Mark `token` as the one being handled. Returns the previous marker so
    /// nested processing of a synthetic token can restore it.
    fn begin_token(&mut self, token: &Token) -> bool {
        std::mem::replace(
            &mut self.handling_end_tag,
            matches!(token, Token::EndTag { .. }),
        )
    }

    /// "Reprocess the token": run it through the dispatcher again after a
    /// mode switch.
    pub(super) fn reprocess_token(&mut self, token: &Token) {
        self.dispatch(token);
    }

    fn dispatch_to_insertion_mode(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.is_html() {
            return true;
        }
        let is_start = matches!(token, Token::StartTag { .. });
        let is_character = matches!(token, Token::Character { .. });

        // "If the adjusted current node is a MathML text integration point and
        //  the token is a start tag whose tag name is neither "mglyph" nor
        //  "malignmark""
        // "If the adjusted current node is a MathML text integration point and
        //  the token is a character token"
        if is_mathml_text_integration_point(element) {
            if is_character {
                return true;
            }
            if let Token::StartTag { name, .. } = token
                && name != "mglyph"
                && name != "malignmark"
            {
                return true;
            }
        }
        // "If the adjusted current node is a MathML annotation-xml element and
        //  the token is a start tag whose tag name is "svg""
        if element.namespace == Namespace::MathMl
            && element.tag_name == "annotation-xml"
            && token.tag_name() == Some("svg")
            && is_start
        {
            return true;
        }
        // "If the adjusted current node is an HTML integration point and the
        //  token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        //  token is a character token"
        if is_html_integration_point(element) && (is_start || is_character) {
            return true;
        }
        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// Route `token` to the current insertion mode, splitting off leading
    /// whitespace first in the modes that treat it separately.
    pub(super) fn process_token(&mut self, token: &Token) {
        if self.insertion_mode.splits_leading_whitespace()
            && let Token::Character { data, cdata } = token
        {
            let split = data
                .char_indices()
                .find(|&(_, c)| !is_whitespace(c))
                .map_or(data.len(), |(index, _)| index);
            if split > 0 && split < data.len() {
                let (leading, rest) = data.split_at(split);
                self.using_rules_for(
                    self.insertion_mode,
                    &Token::Character {
                        data: leading.to_string(),
                        cdata: *cdata,
                    },
                );
                self.reprocess_token(&Token::Character {
                    data: rest.to_string(),
                    cdata: *cdata,
                });
                return;
            }
        }
        self.using_rules_for(self.insertion_mode, token);
    }

    /// "Process the token using the rules for" `mode`.
    pub(super) fn using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        let outer = self.begin_token(token);
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
        self.handling_end_tag = outer;
    }

    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        if mode != self.insertion_mode {
            trace!(target: "weft::parser", "insertion mode {} -> {mode}", self.insertion_mode);
        }
        self.insertion_mode = mode;
    }

    /// Save the current mode as the original insertion mode, then switch.
    pub(super) fn switch_mode_saving_original(&mut self, mode: InsertionMode) {
        self.original_insertion_mode = Some(self.insertion_mode);
        self.switch_mode(mode);
    }

    /// Switch back to the saved original insertion mode.
    pub(super) fn return_to_original_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_mode(mode);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Report `token` as unexpected in the current insertion mode.
    pub(super) fn parse_error(&mut self, token: &Token) {
        let message = format!(
            "Unexpected {} token [{token}] when in state [{}]",
            token.kind_name(),
            self.insertion_mode
        );
        self.source.report_error(message);
    }

    /// Report a tree construction error with a custom message.
    pub(super) fn report_error(&mut self, message: String) {
        self.source.report_error(message);
    }

    // ===== NODE ACCESS =====

    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.current()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        if self.stack_of_open_elements.len() == 1
            && let Some(context) = self.context_element
        {
            return Some(context);
        }
        self.current_node()
    }

    pub(super) fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.as_element(id)
    }

    /// Local name of `id` if it is an HTML element.
    pub(super) fn html_tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id)
            .filter(|element| element.is_html())
            .map(|element| element.tag_name.as_str())
    }

    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.stack_of_open_elements.current_is(&self.tree, name)
    }

    pub(super) fn current_node_is_one_of(&self, names: &[&str]) -> bool {
        self.stack_of_open_elements
            .current_is_one_of(&self.tree, names)
    }

    pub(super) fn template_on_stack(&self) -> bool {
        self.stack_of_open_elements
            .contains_named(&self.tree, "template")
    }

    pub(super) fn in_scope(&self, name: &str) -> bool {
        self.stack_of_open_elements.in_scope(&self.tree, name)
    }

    pub(super) fn in_button_scope(&self, name: &str) -> bool {
        self.stack_of_open_elements.in_button_scope(&self.tree, name)
    }

    pub(super) fn in_table_scope(&self, name: &str) -> bool {
        self.stack_of_open_elements.in_table_scope(&self.tree, name)
    }

    pub(super) fn in_select_scope(&self, name: &str) -> bool {
        self.stack_of_open_elements.in_select_scope(&self.tree, name)
    }

    /// Pop until an HTML element named `name` has been popped.
    pub(super) fn pop_until(&mut self, name: &str) {
        let closed = self.stack_of_open_elements.pop_until(&self.tree, name);
        self.on_node_closed(closed);
    }

    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) {
        let closed = self
            .stack_of_open_elements
            .pop_until_one_of(&self.tree, names);
        self.on_node_closed(closed);
    }

    /// Pop until `node` itself has been popped.
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        self.stack_of_open_elements.pop_until_node(node);
        self.on_node_closed(Some(node));
    }

    /// Record the element a pop-until closed when an end tag drove the pop.
    fn on_node_closed(&mut self, closed: Option<NodeId>) {
        if self.handling_end_tag
            && let Some(node) = closed
        {
            trace!(target: "weft::parser", "closed {node:?} by end tag");
            self.end_tag_closes.push(node);
        }
    }

    pub(super) fn pop_current_node(&mut self) {
        let _ = self.stack_of_open_elements.pop();
    }

    pub(super) fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        self.stack_of_open_elements
            .generate_implied_end_tags(&self.tree, exclude);
    }

    // ===== CREATING AND INSERTING NODES =====

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target". Returns `(parent, insert_before)`.
    pub(super) fn appropriate_place(&self, override_target: Option<NodeId>) -> (NodeId, Option<NodeId>) {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the current
        //          node."
        let Some(target) = override_target.or_else(|| self.current_node()) else {
            return (self.tree.root(), None);
        };

        // STEP 2: "If foster parenting is enabled and target is a table,
        //          tbody, tfoot, thead, or tr element"
        if self.foster_parenting
            && self
                .html_tag_name(target)
                .is_some_and(|name| FOSTER_TARGETS.contains(&name))
        {
            return self.foster_parent_location();
        }
        (target, None)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        // "Let last table be the last table element in the stack of open
        //  elements, if any."
        if let Some(table) = self
            .stack_of_open_elements
            .get_from_stack(&self.tree, "table")
        {
            // "If last table has a parent node, then let adjusted insertion
            //  location be inside last table's parent node, immediately before
            //  last table"
            if let Some(parent) = self.tree.parent(table) {
                return (parent, Some(table));
            }
            // "let previous element be the element immediately above last
            //  table in the stack of open elements"
            if let Some(above) = self.stack_of_open_elements.above(table) {
                return (above, None);
            }
        }
        // "If there is no last table, then let adjusted insertion location be
        //  inside the first element in the stack of open elements (the html
        //  element)"
        (
            self.stack_of_open_elements
                .first()
                .unwrap_or_else(|| self.tree.root()),
            None,
        )
    }

    fn insert_at(&mut self, (parent, before): (NodeId, Option<NodeId>), node: NodeId) {
        match before {
            Some(reference) => self.tree.insert_before(parent, node, reference),
            None => self.tree.append_child(parent, node),
        }
    }

    /// Insert a freshly created node at the appropriate place, then run the
    /// element insertion checks.
    pub(super) fn insert_node(&mut self, node: NodeId) {
        let place = self.appropriate_place(None);
        self.insert_at(place, node);
        self.on_element_inserted(node);
    }

    /// Insert `node` at the appropriate place computed for `override_target`.
    pub(super) fn insert_node_with_override(&mut self, node: NodeId, override_target: NodeId) {
        let place = self.appropriate_place(Some(override_target));
        self.insert_at(place, node);
    }

    fn on_element_inserted(&mut self, node: NodeId) {
        let Some(element) = self.tree.as_element(node) else {
            return;
        };

        // "If element is a form-associated element and not a form-associated
        //  custom element, the form element pointer is not null, there is no
        //  template element on the stack of open elements, element is either
        //  not listed or doesn't have a form attribute, and the intended parent
        //  is in the same tree as the element pointed to by the form element
        //  pointer, then associate element with the form element pointed to by
        //  the form element pointer"
        let associate = element.is_html()
            && is_form_listed(&element.tag_name)
            && !element.has_attribute("form");

        let xmlns_mismatch = element
            .get_attribute("xmlns")
            .filter(|value| *value != element.namespace.uri())
            .map(|value| format!("Invalid xmlns attribute [{value}] on tag [{}]", element.tag_name));

        if associate
            && let Some(form) = self.form_element_pointer
            && !self.template_on_stack()
        {
            let _ = self.form_owners.insert(node, form);
        }
        if let Some(message) = xmlns_mismatch {
            self.report_error(message);
        }
    }

    /// Drop repeated attribute names, keeping the first occurrence.
    pub(super) fn dedupe_attributes(&mut self, token: &Token) -> Vec<Attribute> {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return Vec::new();
        };
        let mut deduped: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if !deduped.iter().any(|kept| kept.name == attribute.name) {
                deduped.push(attribute.clone());
            }
        }
        if deduped.len() != attributes.len() {
            self.report_error(format!("Dropped duplicate attribute(s) in tag [{name}]"));
        }
        deduped
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token" in `namespace`. The element is not yet
    /// attached to the tree.
    pub(super) fn create_element(
        &mut self,
        tag_name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> NodeId {
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            namespace,
            attrs: attributes
                .iter()
                .map(|attr| (attr.name.clone(), attr.value.clone()))
                .collect(),
            self_closing: false,
        }))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// in the HTML namespace."
    ///
    /// A self-closing tag is inserted and pushed, the tokenizer is sent back to
    /// the data state, and a matching end tag is queued so the element closes
    /// straight away.
    ///
    /// # Panics
    ///
    /// Panics if called with a non-`StartTag` token, indicating a parser bug.
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name, self_closing, ..
        } = token
        else {
            panic!("insert_html_element called with non-StartTag token");
        };
        let attributes = self.dedupe_attributes(token);

        if *self_closing {
            let element = self.insert_empty_deduped(name, true, &attributes);
            self.stack_of_open_elements.push(element);
            self.source.request_state(TokenizerState::Data);
            self.source.emit(Token::end_tag(name));
            return element;
        }

        let element = self.create_element(name, Namespace::Html, &attributes);
        self.insert_node(element);
        self.stack_of_open_elements.push(element);
        element
    }

    /// Insert an HTML element for a start tag named `name` with no
    /// attributes, as in "insert an HTML element for a "body" start tag token
    /// with no attributes".
    pub(super) fn insert_html_element_named(&mut self, name: &str) -> NodeId {
        self.insert_html_element(&Token::start_tag(name))
    }

    /// Insert an element that is immediately popped: "Insert an HTML element
    /// for the token. Immediately pop the current node off the stack of open
    /// elements. Acknowledge the token's self-closing flag, if it is set."
    ///
    /// # Panics
    ///
    /// Panics if called with a non-`StartTag` token, indicating a parser bug.
    pub(super) fn insert_empty(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name, self_closing, ..
        } = token
        else {
            panic!("insert_empty called with non-StartTag token");
        };
        let attributes = self.dedupe_attributes(token);
        self.insert_empty_deduped(name, *self_closing, &attributes)
    }

    fn insert_empty_deduped(&mut self, name: &str, self_closing: bool, attributes: &[Attribute]) -> NodeId {
        let element = self.create_element(name, Namespace::Html, attributes);
        self.insert_node(element);
        if self_closing {
            if !is_known_tag(name) {
                self.mark_self_closing(element);
            } else if !is_void_element(name) {
                self.report_error(format!("Tag [{name}] cannot be self closing; not a void tag"));
            }
        }
        element
    }

    fn mark_self_closing(&mut self, element: NodeId) {
        if let Some(data) = self.tree.as_element_mut(element) {
            data.self_closing = true;
        }
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// The caller has already adjusted the tag name and attributes. A
    /// self-closing foreign element is popped right away.
    ///
    /// # Panics
    ///
    /// Panics if called with a non-`StartTag` token, indicating a parser bug.
    pub(super) fn insert_foreign_element(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        let Token::StartTag {
            name, self_closing, ..
        } = token
        else {
            panic!("insert_foreign_element called with non-StartTag token");
        };
        let attributes = self.dedupe_attributes(token);
        let element = self.create_element(name, namespace, &attributes);
        self.insert_node(element);
        self.stack_of_open_elements.push(element);
        if *self_closing {
            self.mark_self_closing(element);
            self.pop_current_node();
        }
        element
    }

    /// Insert a `form` element. When `push` is false the element is inserted
    /// and immediately popped. The form element pointer is set unless
    /// `check_template` is true and a template is open.
    pub(super) fn insert_form(&mut self, token: &Token, push: bool, check_template: bool) -> NodeId {
        let attributes = self.dedupe_attributes(token);
        let form = self.create_element("form", Namespace::Html, &attributes);
        if !check_template || !self.template_on_stack() {
            self.form_element_pointer = Some(form);
        }
        self.insert_node(form);
        if push {
            self.stack_of_open_elements.push(form);
        }
        form
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Inserts a run of characters at the appropriate place, merging into an
    /// adjacent node of the same kind. CDATA runs become CDATA nodes, text in
    /// `script` and `style` becomes raw data nodes.
    pub(super) fn insert_characters(&mut self, data: &str, cdata: bool) {
        if data.is_empty() {
            return;
        }
        // STEP 1: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let (parent, before) = self.appropriate_place(None);

        // STEP 2: "If the adjusted insertion location is in a Document node,
        //          then return."
        if matches!(
            self.tree.get(parent).map(|node| &node.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        let raw_data = self
            .html_tag_name(parent)
            .is_some_and(is_data_content);

        // STEP 3: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data."
        let adjacent = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(adjacent) = adjacent
            && let Some(node) = self.tree.get_mut(adjacent)
        {
            match &mut node.node_type {
                NodeType::CData(existing) if cdata => {
                    existing.push_str(data);
                    return;
                }
                NodeType::Data(existing) if !cdata && raw_data => {
                    existing.push_str(data);
                    return;
                }
                NodeType::Text(existing) if !cdata && !raw_data => {
                    existing.push_str(data);
                    return;
                }
                _ => {}
            }
        }

        // STEP 4: "Otherwise, create a new Text node whose data is data ...
        //          and insert the newly created node at the adjusted insertion
        //          location."
        let node_type = if cdata {
            NodeType::CData(data.to_string())
        } else if raw_data {
            NodeType::Data(data.to_string())
        } else {
            NodeType::Text(data.to_string())
        };
        let node = self.tree.alloc(node_type);
        self.insert_at((parent, before), node);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        let place = self.appropriate_place(None);
        self.insert_at(place, comment);
    }

    /// Insert a comment as the last child of `parent`.
    pub(super) fn insert_comment_in(&mut self, data: &str, parent: NodeId) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// Add the token's attributes that `element` does not have yet, as for a
    /// stray `<html>` or `<body>` start tag.
    pub(super) fn merge_missing_attributes(&mut self, token: &Token, element: NodeId) {
        let Token::StartTag { attributes, .. } = token else {
            return;
        };
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in attributes {
                if !data.has_attribute(&attribute.name) {
                    data.attrs
                        .push((attribute.name.clone(), attribute.value.clone()));
                }
            }
        }
    }

    /// Apply the first `<base href>` of the parse to the base URI.
    pub(super) fn maybe_set_base_uri(&mut self, base: NodeId) {
        if self.base_uri_set_from_doc {
            return;
        }
        let Some(href) = self
            .element(base)
            .and_then(|element| element.get_attribute("href"))
        else {
            return;
        };
        let Ok(resolved) = resolve_url(href, self.base_uri.as_deref()) else {
            return;
        };
        if resolved.is_empty() {
            return;
        }
        trace!(target: "weft::parser", "base URI set to {resolved}");
        self.base_uri = Some(resolved);
        self.base_uri_set_from_doc = true;
    }

    // ===== STACK ALGORITHMS =====

    /// "Close a p element", or any element closed the same way: generate
    /// implied end tags except for `name`, report an error if the current node
    /// is not `name`, then pop until `name` has been popped.
    pub(super) fn close_element(&mut self, name: &str) {
        self.generate_implied_end_tags(Some(name));
        if !self.current_node_is(name) {
            let message = format!(
                "Unexpected EndTag token [</{name}>] when in state [{}]",
                self.insertion_mode
            );
            self.report_error(message);
        }
        self.pop_until(name);
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.in_button_scope("p") {
            self.close_element("p");
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// Walks at most [`MAX_QUEUE_DEPTH`] entries up from the current node. The
    /// last entry visited stands for the context element when parsing a
    /// fragment.
    ///
    /// # Panics
    ///
    /// Panics if a `template` is open with no template insertion mode pushed.
    pub(super) fn reset_insertion_mode(&mut self) {
        if self.stack_of_open_elements.is_empty() {
            self.switch_mode(InsertionMode::InBody);
            return;
        }
        let bottom = self.stack_of_open_elements.len() - 1;
        let upper = bottom.saturating_sub(MAX_QUEUE_DEPTH);

        for position in (upper..=bottom).rev() {
            // STEP 3: "If node is the first node in the stack of open elements,
            //          then set last to true, and, if the parser was created as
            //          part of the HTML fragment parsing algorithm (fragment
            //          case), set node to the context element passed to that
            //          algorithm."
            let last = position == upper;
            let Some(mut node) = self.stack_of_open_elements.get(position) else {
                continue;
            };
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let Some(name) = self.html_tag_name(node) else {
                if last {
                    self.switch_mode(InsertionMode::InBody);
                    return;
                }
                continue;
            };

            let mode = match name {
                "select" => Some(self.select_mode_for(position, upper, last)),
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                "template" => {
                    let Some(&mode) = self.template_insertion_modes.last() else {
                        panic!("template element open with no template insertion mode");
                    };
                    Some(mode)
                }
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                "html" => Some(if self.head_element_pointer.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ if last => Some(InsertionMode::InBody),
                _ => None,
            };
            if let Some(mode) = mode {
                self.switch_mode(mode);
                return;
            }
        }
    }

    /// STEP 4 of resetting the insertion mode, for a `select` at `position`.
    fn select_mode_for(&self, position: usize, upper: usize, last: bool) -> InsertionMode {
        // "If last is true, jump to the step below labeled done."
        if !last {
            for ancestor in (upper..position).rev() {
                let Some(id) = self.stack_of_open_elements.get(ancestor) else {
                    break;
                };
                match self.html_tag_name(id) {
                    // "If ancestor is a template node, jump to the step below
                    //  labeled done."
                    Some("template") => break,
                    // "If ancestor is a table node, switch the insertion mode
                    //  to "in select in table" and return."
                    Some("table") => return InsertionMode::InSelectInTable,
                    _ => {}
                }
            }
        }
        // "Done: Switch the insertion mode to "in select" and return."
        InsertionMode::InSelect
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    pub(super) fn any_other_end_tag(&mut self, token: &Token) {
        let Some(subject) = token.tag_name() else {
            return;
        };
        let nodes: Vec<NodeId> = self.stack_of_open_elements.iter().rev().collect();
        for node in nodes {
            // STEP 2: "Loop: If node is an HTML element with the same tag name
            //          as the token, then:"
            if self.html_tag_name(node) == Some(subject) {
                // "Generate implied end tags, except for HTML elements with the
                //  same tag name as the token."
                self.generate_implied_end_tags(Some(subject));
                // "If node is not the current node, then this is a parse error."
                if self.current_node() != Some(node) {
                    self.parse_error(token);
                }
                // "Pop all the nodes from the current node up to node,
                //  including node, then stop these steps."
                self.pop_until_node(node);
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this
            //          is a parse error; ignore the token, and return."
            if self.element(node).is_some_and(is_special) {
                self.parse_error(token);
                return;
            }
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        if self.stack_of_open_elements.len() > MAX_QUEUE_DEPTH {
            return;
        }
        let Some(start) = self
            .active_formatting_elements
            .reconstruction_start(&self.stack_of_open_elements)
        else {
            return;
        };

        // STEP 7-10: "Advance ... Create: Insert an HTML element for the token
        //             for which the element entry was created, to obtain new
        //             element. Replace the entry for entry in the list with an
        //             entry for new element."
        for index in start..self.active_formatting_elements.len() {
            let Some(ActiveFormattingElement::Element { token, .. }) =
                self.active_formatting_elements.get(index).cloned()
            else {
                continue;
            };
            let element = self.recreate_element(&token);
            self.insert_node(element);
            self.stack_of_open_elements.push(element);
            self.active_formatting_elements.set(index, element, token);
        }
    }

    /// A fresh HTML element with the tag name and attributes of `token`.
    pub(super) fn recreate_element(&mut self, token: &Token) -> NodeId {
        let (name, attributes) = match token {
            Token::StartTag {
                name, attributes, ..
            } => (name.as_str(), attributes.as_slice()),
            _ => ("", &[][..]),
        };
        self.create_element(name, Namespace::Html, attributes)
    }

    /// "Push onto the list of active formatting elements that element."
    ///
    /// The entry keeps the element's de-duplicated attributes.
    pub(super) fn push_active_formatting_element(&mut self, element: NodeId) {
        let Some(data) = self.element(element) else {
            return;
        };
        let token = Token::StartTag {
            name: data.tag_name.clone(),
            self_closing: false,
            attributes: data
                .attrs
                .iter()
                .map(|(name, value)| Attribute::new(name.clone(), value.clone()))
                .collect(),
        };
        self.active_formatting_elements.push(element, token);
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "generic raw text element parsing algorithm" and "generic RCDATA element
    /// parsing algorithm". The tokenizer state is requested before inserting,
    /// so that a self-closing tag's reset to the data state wins.
    pub(super) fn parse_text_element(&mut self, token: &Token, state: TokenizerState) {
        self.source.request_state(state);
        let _ = self.insert_html_element(token);
        self.switch_mode_saving_original(InsertionMode::Text);
    }

    /// "Stop parsing."
    pub(super) fn stop_parsing(&mut self) {
        trace!(target: "weft::parser", "stop parsing in {}", self.insertion_mode);
        self.stopped = true;
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Foreign elements carry their namespace prefix (`svg path`, `math mi`).
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    write_node(tree, id, indent, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let line = match &node.node_type {
        NodeType::Document => "#document".to_string(),
        NodeType::Doctype {
            name,
            public_id,
            system_id,
        } => {
            if public_id.is_empty() && system_id.is_empty() {
                format!("<!DOCTYPE {name}>")
            } else {
                format!("<!DOCTYPE {name} \"{public_id}\" \"{system_id}\">")
            }
        }
        NodeType::Element(data) => {
            let name = match data.namespace {
                Namespace::Html => data.tag_name.clone(),
                namespace => format!("{} {}", namespace.prefix(), data.tag_name),
            };
            if data.attrs.is_empty() {
                format!("<{name}>")
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                format!("<{name} {}>", attrs.join(" "))
            }
        }
        NodeType::Text(data) | NodeType::Data(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeType::CData(data) => format!("<![CDATA[{data}]]>"),
        NodeType::Comment(data) => format!("<!-- {data} -->"),
    };
    out.push_str(&prefix);
    out.push_str(&line);
    out.push('\n');
    for &child_id in tree.children(id) {
        write_node(tree, child_id, indent + 1, out);
    }
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    print!("{}", dump_tree(tree, id, indent));
}
