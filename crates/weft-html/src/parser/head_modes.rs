//! The document prologue modes: "initial" through "after head", plus "text".

use weft_dom::{Namespace, NodeType, QuirksMode};

use super::core::{HTMLParser, InsertionMode, is_all_whitespace};
use super::quirks::{is_doctype_error, quirks_mode_for_doctype};
use crate::tokenizer::{Token, TokenSource, TokenizerState};

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
/// FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
/// SPACE"
pub(super) fn is_whitespace_token(token: &Token) -> bool {
    matches!(token, Token::Character { data, .. } if is_all_whitespace(data))
}

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "Ignore the token."
            _ if is_whitespace_token(token) => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let root = self.tree.root();
                self.insert_comment_in(data, root);
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let name = name.as_deref();
                let public = public_identifier.as_deref();
                let system = system_identifier.as_deref();

                // "If the DOCTYPE token's name is not "html", or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor "about:legacy-compat",
                //  then there is a parse error."
                if is_doctype_error(name, public, system) {
                    self.parse_error(token);
                }

                // "Append a DocumentType node to the Document node, with its
                //  name set to the name given in the DOCTYPE token, or the
                //  empty string if the name was missing"
                let doctype = self.tree.alloc(NodeType::Doctype {
                    name: name.unwrap_or_default().to_string(),
                    public_id: public.unwrap_or_default().to_string(),
                    system_id: system.unwrap_or_default().to_string(),
                });
                let root = self.tree.root();
                self.tree.append_child(root, doctype);

                let mode = quirks_mode_for_doctype(name, public, system, *force_quirks);
                self.tree.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_mode(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            //  a parse error; if the parser cannot change the mode flag is
            //  false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            //  reprocess the token."
            _ => {
                self.parse_error(token);
                self.tree.set_quirks_mode(QuirksMode::Quirks);
                self.switch_mode(InsertionMode::BeforeHtml);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(token),

            // "A comment token"
            Token::Comment { data } => {
                let root = self.tree.root();
                self.insert_comment_in(data, root);
            }

            _ if is_whitespace_token(token) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            //  Document as the intended parent. Append it to the Document
            //  object. Put this element in the stack of open elements."
            Token::StartTag { name, .. } if name == "html" => {
                let attributes = self.dedupe_attributes(token);
                let html = self.create_element(name, Namespace::Html, &attributes);
                let root = self.tree.root();
                self.tree.append_child(root, html);
                self.stack_of_open_elements.push(html);
                self.switch_mode(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_html_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(token),

            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn before_html_anything_else(&mut self, token: &Token) {
        let html = self.create_element("html", Namespace::Html, &[]);
        let root = self.tree.root();
        self.tree.append_child(root, html);
        self.stack_of_open_elements.push(html);
        self.switch_mode(InsertionMode::BeforeHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            _ if is_whitespace_token(token) => {}

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element
            //  pointer to the newly created head element."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element_pointer = Some(head);
                self.switch_mode(InsertionMode::InHead);
            }

            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.before_head_anything_else(token);
            }

            Token::EndTag { .. } => self.parse_error(token),

            _ => self.before_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no
    /// attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self, token: &Token) {
        let head = self.insert_html_element_named("head");
        self.head_element_pointer = Some(head);
        self.switch_mode(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "Insert the character."
            Token::Character { data, cdata } if is_all_whitespace(data) => {
                self.insert_characters(data, *cdata);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link") =>
            {
                let element = self.insert_empty(token);
                if name == "base" {
                    self.maybe_set_base_uri(element);
                }
            }

            // "A start tag whose tag name is "meta""
            Token::StartTag { name, .. } if name == "meta" => {
                let _ = self.insert_empty(token);
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.parse_text_element(token, TokenizerState::RCDATA);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. } if matches!(name.as_str(), "noframes" | "style") => {
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is disabled"
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InHeadNoscript);
            }

            // "A start tag whose tag name is "script""
            // "Switch the tokenizer to the script data state. Let the original
            //  insertion mode be the current insertion mode. Switch the
            //  insertion mode to "text"."
            Token::StartTag { name, .. } if name == "script" => {
                self.parse_text_element(token, TokenizerState::ScriptData);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            //  stack of open elements."
            Token::EndTag { name, .. } if name == "head" => {
                self.pop_current_node();
                self.switch_mode(InsertionMode::AfterHead);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.in_head_anything_else(token);
            }

            // "A start tag whose tag name is "template""
            Token::StartTag { name, .. } if name == "template" => {
                let _ = self.insert_html_element(token);
                // "Insert a marker at the end of the list of active formatting
                //  elements."
                self.active_formatting_elements.insert_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.switch_mode(InsertionMode::InTemplate);
                // "Push "in template" onto the stack of template insertion
                //  modes so that it is the new current template insertion
                //  mode."
                self.template_insertion_modes
                    .push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => {
                // "If there is no template element on the stack of open
                //  elements, then this is a parse error; ignore the token."
                if !self.template_on_stack() {
                    self.parse_error(token);
                    return;
                }
                self.stack_of_open_elements
                    .generate_all_implied_end_tags_thoroughly(&self.tree);
                if !self.current_node_is("template") {
                    self.parse_error(token);
                }
                self.pop_until("template");
                self.active_formatting_elements.clear_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode();
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => self.parse_error(token),
            Token::EndTag { .. } => self.parse_error(token),

            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) {
        self.pop_current_node();
        self.switch_mode(InsertionMode::AfterHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from
            //  the stack of open elements; the new current node will be a head
            //  element."
            Token::EndTag { name, .. } if name == "noscript" => {
                self.pop_current_node();
                self.switch_mode(InsertionMode::InHead);
            }

            // "Process the token using the rules for the "in head" insertion
            //  mode."
            Token::Comment { .. } => self.using_rules_for(InsertionMode::InHead, token),
            _ if is_whitespace_token(token) => {
                self.using_rules_for(InsertionMode::InHead, token);
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndTag { name, .. } if name == "br" => self.in_head_noscript_anything_else(token),

            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(token);
            }
            Token::EndTag { .. } => self.parse_error(token),

            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        self.parse_error(token);
        self.pop_current_node();
        self.switch_mode(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, cdata } if is_all_whitespace(data) => {
                self.insert_characters(data, *cdata);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "body""
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "frameset""
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                // "Parse error."
                self.parse_error(token);
                // "Push the node pointed to by the head element pointer onto
                //  the stack of open elements."
                let Some(head) = self.head_element_pointer else {
                    self.using_rules_for(InsertionMode::InHead, token);
                    return;
                };
                self.stack_of_open_elements.push(head);
                // "Process the token using the rules for the "in head"
                //  insertion mode."
                self.using_rules_for(InsertionMode::InHead, token);
                // "Remove the node pointed to by the head element pointer from
                //  the stack of open elements. (It might not be the current
                //  node at this point.)"
                let _ = self.stack_of_open_elements.remove(head);
            }

            Token::EndTag { name, .. } if name == "template" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.after_head_anything_else(token);
            }

            Token::StartTag { name, .. } if name == "head" => self.parse_error(token),
            Token::EndTag { .. } => self.parse_error(token),

            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element_named("body");
        self.switch_mode(InsertionMode::InBody);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data, cdata } => self.insert_characters(data, *cdata),

            // "An end-of-file token"
            // "Parse error. Pop the current node off the stack of open
            //  elements. Switch the insertion mode to the original insertion
            //  mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(token);
                self.pop_current_node();
                self.return_to_original_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is "script"" / "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            //  insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                self.pop_current_node();
                self.return_to_original_mode();
            }

            // Not emitted by the tokenizer in raw text states.
            _ => {}
        }
    }
}
