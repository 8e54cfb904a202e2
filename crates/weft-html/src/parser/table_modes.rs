//! The table insertion modes: "in table" through "in cell".

use super::core::{HTMLParser, InsertionMode, is_all_whitespace};
use crate::tokenizer::{Token, TokenSource};

/// "in table" switches to "in table text" for characters when the current
/// node is one of these.
const TABLE_TEXT_PARENTS: &[&str] = &["table", "tbody", "template", "tfoot", "thead", "tr"];

/// The table sections closed together by "in table body".
const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            //  template, tfoot, thead, or tr element"
            Token::Character { .. } if self.current_node_is_one_of(TABLE_TEXT_PARENTS) => {
                // "Let the pending table character tokens be an empty list of
                //  tokens."
                self.pending_table_character_tokens.clear();
                // "Let the original insertion mode be the current insertion
                //  mode."
                // "Switch the insertion mode to "in table text" and reprocess
                //  the token."
                self.switch_mode_saving_original(InsertionMode::InTableText);
                self.reprocess_token(token);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                "caption" => {
                    self.stack_of_open_elements
                        .clear_to_table_context(&self.tree);
                    self.active_formatting_elements.insert_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.stack_of_open_elements
                        .clear_to_table_context(&self.tree);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Insert an HTML element for a "colgroup" start tag token with
                //  no attributes, then switch the insertion mode to "in column
                //  group". Reprocess the current token."
                "col" => {
                    self.stack_of_open_elements
                        .clear_to_table_context(&self.tree);
                    let _ = self.insert_html_element_named("colgroup");
                    self.switch_mode(InsertionMode::InColumnGroup);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                //  "thead""
                "tbody" | "tfoot" | "thead" => {
                    self.stack_of_open_elements
                        .clear_to_table_context(&self.tree);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                "td" | "th" | "tr" => {
                    self.stack_of_open_elements
                        .clear_to_table_context(&self.tree);
                    let _ = self.insert_html_element_named("tbody");
                    self.switch_mode(InsertionMode::InTableBody);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error."
                    self.parse_error(token);
                    // "If the stack of open elements does not have a table
                    //  element in table scope, ignore the token."
                    if !self.in_table_scope("table") {
                        return;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    //  element has been popped from the stack. Reset the
                    //  insertion mode appropriately. Reprocess the token."
                    self.pop_until("table");
                    self.reset_insertion_mode();
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "style", "script",
                //  "template""
                "style" | "script" | "template" => {
                    self.using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  act as described in the "anything else" entry below."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
                {
                    // "Parse error. Insert an HTML element for the token. Pop
                    //  that input element off the stack of open elements."
                    self.parse_error(token);
                    let _ = self.insert_empty(token);
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    self.parse_error(token);
                    // "If there is a template element on the stack of open
                    //  elements, or if the form element pointer is not null,
                    //  ignore the token."
                    if self.template_on_stack() || self.form_element_pointer.is_some() {
                        return;
                    }
                    // "Otherwise: Insert an HTML element for the token, and set
                    //  the form element pointer to point to the element
                    //  created. Pop that form element off the stack of open
                    //  elements."
                    let _ = self.insert_form(token, false, false);
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    if !self.in_table_scope("table") {
                        self.parse_error(token);
                        return;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                //  "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                //  "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => self.parse_error(token),

                "template" => self.using_rules_for(InsertionMode::InHead, token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::EndOfFile => self.using_rules_for(InsertionMode::InBody, token),

            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.parse_error(token);
        self.foster_parenting = true;
        self.using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "Any other character token"
            // "Append the character token to the pending table character
            //  tokens list."
            Token::Character { data, .. } => {
                if data.contains('\0') {
                    self.parse_error(token);
                    let kept = data.replace('\0', "");
                    if !kept.is_empty() {
                        self.pending_table_character_tokens.push(kept);
                    }
                } else {
                    self.pending_table_character_tokens.push(data.clone());
                }
            }

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens).concat();
                if !pending.is_empty() {
                    // "If any of the tokens in the pending table character
                    //  tokens list are character tokens that are not ASCII
                    //  whitespace, then this is a parse error: reprocess the
                    //  character tokens in the pending table character tokens
                    //  list using the rules given in the "anything else" entry
                    //  in the "in table" insertion mode."
                    // "Otherwise, insert the characters given by the pending
                    //  table character tokens list."
                    if is_all_whitespace(&pending) {
                        self.insert_characters(&pending, false);
                    } else {
                        self.in_table_anything_else(&Token::text(pending));
                    }
                }
                // "Switch the insertion mode to the original insertion mode
                //  and reprocess the token."
                self.return_to_original_mode();
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if self.close_caption(token) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            //  "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            _ => self.using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// Close the open caption. Returns false when there is none in table
    /// scope and the token was ignored.
    fn close_caption(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a caption element in
        //  table scope, this is a parse error; ignore the token. (fragment
        //  case)"
        if !self.in_table_scope("caption") {
            self.parse_error(token);
            return false;
        }
        // "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "Now, if the current node is not a caption element, then this is a
        //  parse error."
        if !self.current_node_is("caption") {
            self.parse_error(token);
        }
        // "Pop elements from this stack until a caption element has been
        //  popped from the stack."
        self.pop_until("caption");
        // "Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();
        // "Switch the insertion mode to "in table"."
        self.switch_mode(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data, cdata } if is_all_whitespace(data) => {
                self.insert_characters(data, *cdata);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } if name == "html" => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_empty(token);
            }

            // "An end tag whose tag name is "colgroup""
            Token::EndTag { name, .. } if name == "colgroup" => {
                // "If the current node is not a colgroup element, then this is
                //  a parse error; ignore the token."
                if !self.current_node_is("colgroup") {
                    self.parse_error(token);
                    return;
                }
                self.pop_current_node();
                self.switch_mode(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            Token::EndTag { name, .. } if name == "col" => self.parse_error(token),

            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            Token::EndOfFile => self.using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            _ => {
                // "If the current node is not a colgroup element, then this is
                //  a parse error; ignore the token."
                if !self.current_node_is("colgroup") {
                    self.parse_error(token);
                    return;
                }
                // "Otherwise, pop the current node from the stack of open
                //  elements. Switch the insertion mode to "in table".
                //  Reprocess the token."
                self.pop_current_node();
                self.switch_mode(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is "tr""
            Token::StartTag { name, .. } if name == "tr" => {
                self.stack_of_open_elements
                    .clear_to_table_body_context(&self.tree);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            Token::StartTag { name, .. } if name == "th" || name == "td" => {
                self.parse_error(token);
                self.stack_of_open_elements
                    .clear_to_table_body_context(&self.tree);
                let _ = self.insert_html_element_named("tr");
                self.switch_mode(InsertionMode::InRow);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.in_table_scope(name) {
                    self.parse_error(token);
                    return;
                }
                self.stack_of_open_elements
                    .clear_to_table_body_context(&self.tree);
                self.pop_current_node();
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.close_table_section(token);
            }
            Token::EndTag { name, .. } if name == "table" => self.close_table_section(token),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th", "tr""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(token);
            }

            // "Process the token using the rules for the "in table" insertion
            //  mode."
            _ => self.using_rules_for(InsertionMode::InTable, token),
        }
    }

    fn close_table_section(&mut self, token: &Token) {
        // "If the stack of open elements does not have a tbody, thead, or
        //  tfoot element in table scope, this is a parse error; ignore the
        //  token."
        if !self
            .stack_of_open_elements
            .in_table_scope_any(&self.tree, TABLE_SECTIONS)
        {
            self.parse_error(token);
            return;
        }
        // "Clear the stack back to a table body context. Pop the current node
        //  from the stack of open elements. Switch the insertion mode to "in
        //  table". Reprocess the token."
        self.stack_of_open_elements
            .clear_to_table_body_context(&self.tree);
        self.pop_current_node();
        self.switch_mode(InsertionMode::InTable);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            Token::StartTag { name, .. } if name == "th" || name == "td" => {
                self.stack_of_open_elements
                    .clear_to_table_row_context(&self.tree);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InCell);
                self.active_formatting_elements.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.in_table_scope(name) {
                    self.parse_error(token);
                    return;
                }
                // "If the stack of open elements does not have a tr element in
                //  table scope, ignore the token."
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(token);
            }

            _ => self.using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// Close the open row. Returns false when there is no `tr` in table scope
    /// and the token was ignored.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.in_table_scope("tr") {
            self.parse_error(token);
            return false;
        }
        // "Clear the stack back to a table row context. Pop the current node
        //  (which will be a tr element) from the stack of open elements.
        //  Switch the insertion mode to "in table body"."
        self.stack_of_open_elements
            .clear_to_table_row_context(&self.tree);
        self.pop_current_node();
        self.switch_mode(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if name == "td" || name == "th" => {
                if !self.in_table_scope(name) {
                    self.parse_error(token);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(token);
                }
                self.pop_until(name);
                self.active_formatting_elements.clear_to_last_marker();
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                // "Assert: The stack of open elements has a td or th element
                //  in table scope."
                if !self
                    .stack_of_open_elements
                    .in_table_scope_any(&self.tree, &["td", "th"])
                {
                    self.parse_error(token);
                    return;
                }
                self.close_the_cell(token);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error(token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            //  "thead", "tr""
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.in_table_scope(name) {
                    self.parse_error(token);
                    return;
                }
                self.close_the_cell(token);
                self.reprocess_token(token);
            }

            _ => self.using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm"
    fn close_the_cell(&mut self, token: &Token) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element,
        //          then this is a parse error."
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(token);
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        //          td element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.active_formatting_elements.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.switch_mode(InsertionMode::InRow);
    }
}
