//! "in select" and "in select in table".

use super::core::{HTMLParser, InsertionMode};
use crate::tokenizer::{Token, TokenSource};

/// Table structure tags that break out of a select nested in a table.
const TABLE_BREAKOUT_TAGS: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data, cdata } => {
                if data.contains('\0') {
                    self.parse_error(token);
                    self.insert_characters(&data.replace('\0', ""), *cdata);
                } else {
                    self.insert_characters(data, *cdata);
                }
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node
                //  from the stack of open elements. Insert an HTML element for
                //  the token."
                "option" => {
                    self.pop_if_current("option");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "optgroup""
                "optgroup" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                "hr" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_empty(token);
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a
                //  select element in select scope, ignore the token. (fragment
                //  case) Otherwise: Pop elements from the stack of open
                //  elements until a select element has been popped from the
                //  stack. Reset the insertion mode appropriately."
                "select" => {
                    self.parse_error(token);
                    if self.in_select_scope("select") {
                        self.pop_until("select");
                        self.reset_insertion_mode();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                //  "textarea""
                "input" | "keygen" | "textarea" => {
                    self.parse_error(token);
                    if !self.in_select_scope("select") {
                        return;
                    }
                    self.pop_until("select");
                    self.reset_insertion_mode();
                    self.reprocess_token(token);
                }

                "script" | "template" => self.using_rules_for(InsertionMode::InHead, token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    //  node immediately before it in the stack of open elements
                    //  is an optgroup element, then pop the current node from
                    //  the stack of open elements."
                    let len = self.stack_of_open_elements.len();
                    let above_is_optgroup = len >= 2
                        && self
                            .stack_of_open_elements
                            .get(len - 2)
                            .is_some_and(|node| self.html_tag_name(node) == Some("optgroup"));
                    if self.current_node_is("option") && above_is_optgroup {
                        self.pop_current_node();
                    }
                    // "If the current node is an optgroup element, then pop
                    //  that node from the stack of open elements. Otherwise,
                    //  this is a parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        self.pop_current_node();
                    } else {
                        self.parse_error(token);
                    }
                }

                // "An end tag whose tag name is "option""
                "option" => {
                    if self.current_node_is("option") {
                        self.pop_current_node();
                    } else {
                        self.parse_error(token);
                    }
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    if !self.in_select_scope("select") {
                        self.parse_error(token);
                        return;
                    }
                    self.pop_until("select");
                    self.reset_insertion_mode();
                }

                "template" => self.using_rules_for(InsertionMode::InHead, token),

                _ => self.parse_error(token),
            },

            Token::EndOfFile => self.using_rules_for(InsertionMode::InBody, token),
        }
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.current_node_is(name) {
            self.pop_current_node();
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            //  a select element has been popped from the stack. Reset the
            //  insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_BREAKOUT_TAGS.contains(&name.as_str()) => {
                self.parse_error(token);
                self.pop_until("select");
                self.reset_insertion_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name, .. } if TABLE_BREAKOUT_TAGS.contains(&name.as_str()) => {
                self.parse_error(token);
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as that of the token, then ignore the token."
                if !self.in_table_scope(name) {
                    return;
                }
                self.pop_until("select");
                self.reset_insertion_mode();
                self.reprocess_token(token);
            }

            _ => self.using_rules_for(InsertionMode::InSelect, token),
        }
    }
}
