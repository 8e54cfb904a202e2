//! The trailing modes: "after body", the frameset modes, and the two "after
//! after" modes.

use super::core::{HTMLParser, InsertionMode, is_whitespace};
use super::head_modes::is_whitespace_token;
use crate::tokenizer::{Token, TokenSource};

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            _ if is_whitespace_token(token) => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            //  stack of open elements (the html element)."
            Token::Comment { data } => {
                let parent = self
                    .stack_of_open_elements
                    .first()
                    .unwrap_or_else(|| self.tree.root());
                self.insert_comment_in(data, parent);
            }

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            //  algorithm, this is a parse error; ignore the token. (fragment
            //  case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                if self.fragment_parsing {
                    self.parse_error(token);
                } else {
                    self.switch_mode(InsertionMode::AfterAfterBody);
                }
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => {
                self.parse_error(token);
                self.switch_mode(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, cdata } => self.insert_frameset_whitespace(token, data, *cdata),

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.using_rules_for(InsertionMode::InBody, token),
                // "A start tag whose tag name is "frameset""
                "frameset" => {
                    let _ = self.insert_html_element(token);
                }
                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                "frame" => {
                    let _ = self.insert_empty(token);
                }
                "noframes" => self.using_rules_for(InsertionMode::InHead, token),
                _ => self.parse_error(token),
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name, .. } if name == "frameset" => {
                // "If the current node is the root html element, then this is a
                //  parse error; ignore the token. (fragment case)"
                if self.current_node() == self.stack_of_open_elements.first()
                    && self.current_node_is("html")
                {
                    self.parse_error(token);
                    return;
                }
                // "Otherwise, pop the current node from the stack of open
                //  elements."
                self.pop_current_node();
                // "If the parser was not created as part of the HTML fragment
                //  parsing algorithm (fragment case), and the current node is
                //  no longer a frameset element, then switch the insertion mode
                //  to "after frameset"."
                if !self.fragment_parsing && !self.current_node_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
            }

            Token::EndTag { .. } => self.parse_error(token),

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            //  parse error."
            Token::EndOfFile => {
                if self.current_node() != self.stack_of_open_elements.first() {
                    self.parse_error(token);
                }
                self.stop_parsing();
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, cdata } => self.insert_frameset_whitespace(token, data, *cdata),

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterFrameset);
            }

            Token::StartTag { name, .. } if name == "noframes" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            _ => self.parse_error(token),
        }
    }

    /// Frameset modes keep only the whitespace of a character token. Dropped
    /// characters are a parse error.
    fn insert_frameset_whitespace(&mut self, token: &Token, data: &str, cdata: bool) {
        let whitespace: String = data.chars().filter(|&c| is_whitespace(c)).collect();
        if whitespace.len() != data.len() {
            self.parse_error(token);
        }
        self.insert_characters(&whitespace, cdata);
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let root = self.tree.root();
                self.insert_comment_in(data, root);
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::Doctype { .. } => self.using_rules_for(InsertionMode::InBody, token),
            _ if is_whitespace_token(token) => {
                self.using_rules_for(InsertionMode::InBody, token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => {
                self.parse_error(token);
                self.switch_mode(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => {
                let root = self.tree.root();
                self.insert_comment_in(data, root);
            }

            Token::Doctype { .. } => self.using_rules_for(InsertionMode::InBody, token),
            _ if is_whitespace_token(token) => {
                self.using_rules_for(InsertionMode::InBody, token);
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            Token::EndOfFile => self.stop_parsing(),

            Token::StartTag { name, .. } if name == "noframes" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.parse_error(token),
        }
    }
}
