//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use weft_dom::{Namespace, NodeId, QuirksMode};

use super::core::{HTMLParser, InsertionMode, is_all_whitespace};
use super::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
};
use super::tags::{
    BLOCK_END_TAGS, BLOCK_START_TAGS, END_OF_BODY_ALLOWED, FORMATTING_ELEMENTS, HEADINGS,
    is_formatting, is_special,
};
use crate::tokenizer::{Token, TokenSource, TokenizerState};

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any. Insert the
            //  token's character."
            // "Any other character token"
            // "Reconstruct the active formatting elements, if any. Insert the
            //  token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data, cdata } => {
                let data = if data.contains('\0') {
                    self.parse_error(token);
                    data.replace('\0', "")
                } else {
                    data.clone()
                };
                if data.is_empty() {
                    return;
                }
                self.reconstruct_active_formatting_elements();
                self.insert_characters(&data, *cdata);
                if !is_all_whitespace(&data) {
                    self.frameset_ok = false;
                }
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(token),

            Token::StartTag { name, .. } => self.in_body_start_tag(token, name),
            Token::EndTag { name, .. } => self.in_body_end_tag(token, name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                //  process the token using the rules for the "in template"
                //  insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.using_rules_for(InsertionMode::InTemplate, token);
                    return;
                }
                // "If there is a node in the stack of open elements that is not
                //  either a dd element, a dt element, an li element, an
                //  optgroup element, an option element, a p element, an rb
                //  element, an rp element, an rt element, an rtc element, a
                //  tbody element, a td element, a tfoot element, a th element,
                //  a thead element, a tr element, the body element, or the html
                //  element, then this is a parse error."
                if self
                    .stack_of_open_elements
                    .on_stack_not(&self.tree, END_OF_BODY_ALLOWED)
                {
                    self.parse_error(token);
                }
                // "Stop parsing."
                self.stop_parsing();
            }
        }
    }

    fn in_body_start_tag(&mut self, token: &Token, name: &str) {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error(token);
                // "If there is a template element on the stack of open
                //  elements, then ignore the token."
                if self.template_on_stack() {
                    return;
                }
                // "Otherwise, for each attribute on the token, check to see if
                //  the attribute is already present on the top element of the
                //  stack of open elements. If it is not, add the attribute and
                //  its corresponding value to that element."
                if let Some(html) = self.stack_of_open_elements.first() {
                    self.merge_missing_attributes(token, html);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            // "Process the token using the rules for the "in head" insertion
            //  mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error(token);
                // "If the stack of open elements has only one node on it, if
                //  the second element on the stack of open elements is not a
                //  body element, or if there is a template element on the
                //  stack of open elements, then ignore the token."
                let Some(body) = self.second_element_if_body() else {
                    return;
                };
                if self.template_on_stack() {
                    return;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                //  each attribute on the token, check to see if the attribute
                //  is already present on the body element (the second element)
                //  on the stack of open elements, and if it is not, add the
                //  attribute and its corresponding value to that element."
                self.frameset_ok = false;
                self.merge_missing_attributes(token, body);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                self.parse_error(token);
                let Some(body) = self.second_element_if_body() else {
                    return;
                };
                // "If the frameset-ok flag is set to "not ok", ignore the
                //  token."
                if !self.frameset_ok {
                    return;
                }
                // STEP 1: "Remove the second element on the stack of open
                //          elements from its parent node, if it has one."
                self.tree.detach(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of
                //          open elements, from the current node up to, but not
                //          including, the root html element."
                while self.stack_of_open_elements.len() > 1 {
                    self.pop_current_node();
                }
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Switch the insertion mode to "in frameset"."
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            //  "aside", "blockquote", "center", "details", "dialog", "dir",
            //  "div", "dl", "fieldset", "figcaption", "figure", "footer",
            //  "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            //  "section", "summary", "ul""
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                //  of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                //  parse error; pop the current node off the stack of open
                //  elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error(token);
                    self.pop_current_node();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                // "If the next token is a U+000A LINE FEED (LF) character
                //  token, then ignore that token and move on to the next one.
                //  (Newlines at the start of pre blocks are ignored as an
                //  authoring convenience.)"
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                //  template element on the stack of open elements, then this is
                //  a parse error; ignore the token."
                if self.form_element_pointer.is_some() && !self.template_on_stack() {
                    self.parse_error(token);
                    return;
                }
                self.close_p_element_in_button_scope();
                // "Insert an HTML element for the token, and, if there is no
                //  template element on the stack of open elements, set the form
                //  element pointer to point to the element created."
                let _ = self.insert_form(token, true, true);
            }

            // "A start tag whose tag name is "li""
            "li" => {
                self.frameset_ok = false;
                self.close_list_item(token, &["li"]);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.frameset_ok = false;
                self.close_list_item(token, &["dd", "dt"]);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "plaintext""
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.source.request_state(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                if self.in_scope("button") {
                    // "Parse error."
                    self.parse_error(token);
                    // "Generate implied end tags."
                    self.generate_implied_end_tags(None);
                    // "Pop elements from the stack of open elements until a
                    //  button element has been popped from the stack."
                    self.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                //  element between the end of the list and the last marker on
                //  the list (or the start of the list if there is no marker on
                //  the list), then this is a parse error; run the adoption
                //  agency algorithm for the token, then remove that element from
                //  the list of active formatting elements and the stack of open
                //  elements if the adoption agency algorithm didn't already
                //  remove it"
                let existing = self
                    .active_formatting_elements
                    .last_named_after_marker("a")
                    .map(|(_, node, _)| node);
                if let Some(existing) = existing {
                    self.parse_error(token);
                    let end_a = Token::end_tag("a");
                    if !self.run_adoption_agency(&end_a) {
                        self.any_other_end_tag(&end_a);
                    }
                    let _ = self.active_formatting_elements.remove(existing);
                    let _ = self.stack_of_open_elements.remove(existing);
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                //  then this is a parse error; run the adoption agency
                //  algorithm for the token, then once again reconstruct the
                //  active formatting elements, if any."
                if self.in_scope("nobr") {
                    self.parse_error(token);
                    let end_nobr = Token::end_tag("nobr");
                    if !self.run_adoption_agency(&end_nobr) {
                        self.any_other_end_tag(&end_nobr);
                    }
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            //  "font", "i", "s", "small", "strike", "strong", "tt", "u""
            _ if is_formatting(name) => self.insert_formatting_element(token),

            // "A start tag whose tag name is one of: "applet", "marquee",
            //  "object""
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.active_formatting_elements.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of
                //  open elements has a p element in button scope, then close a
                //  p element."
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            //  "img", "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_empty(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_empty(token);
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  set the frameset-ok flag to "not ok"."
                let hidden = token
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source",
            //  "track""
            "param" | "source" | "track" => {
                let _ = self.insert_empty(token);
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_empty(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            //  it. (Don't ask.)"
            "image" => {
                self.parse_error(token);
                if let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token
                {
                    let img = Token::StartTag {
                        name: "img".to_string(),
                        self_closing: *self_closing,
                        attributes: attributes.clone(),
                    };
                    self.reprocess_token(&img);
                }
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // "If the next token is a U+000A LINE FEED (LF) character
                //  token, then ignore that token and move on to the next one."
                self.skip_next_newline = true;
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RCDATA);
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(token, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled"
            "noembed" => self.parse_text_element(token, TokenizerState::RAWTEXT),

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption",
                //  "in table body", "in row", or "in cell", then switch the
                //  insertion mode to "in select in table". Otherwise, switch
                //  the insertion mode to "in select"."
                let mode = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                self.switch_mode(mode);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    self.pop_current_node();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            "rb" | "rtc" => {
                if self.in_scope("ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error(token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            "rp" | "rt" => {
                if self.in_scope("ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            "math" => {
                self.reconstruct_active_formatting_elements();
                let mut adjusted = token.clone();
                if let Token::StartTag { attributes, .. } = &mut adjusted {
                    // "Adjust MathML attributes for the token."
                    adjust_mathml_attributes(attributes);
                    // "Adjust foreign attributes for the token."
                    adjust_foreign_attributes(attributes);
                }
                // "Insert a foreign element for the token, with MathML
                //  namespace and false."
                let _ = self.insert_foreign_element(&adjusted, Namespace::MathMl);
            }

            // "A start tag whose tag name is "svg""
            "svg" => {
                self.reconstruct_active_formatting_elements();
                let mut adjusted = token.clone();
                if let Token::StartTag { attributes, .. } = &mut adjusted {
                    adjust_svg_attributes(attributes);
                    adjust_foreign_attributes(attributes);
                }
                let _ = self.insert_foreign_element(&adjusted, Namespace::Svg);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            //  "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => self.parse_error(token),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) {
        match name {
            // "An end tag whose tag name is "template""
            "template" => self.using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            "body" => {
                if self.close_body(token) {
                    self.switch_mode(InsertionMode::AfterBody);
                }
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after body". Reprocess the token."
            "html" => {
                if self.close_body(token) {
                    self.switch_mode(InsertionMode::AfterBody);
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "address", "article",
            //  "aside", "blockquote", "button", "center", "details", "dialog",
            //  "dir", "div", "dl", "fieldset", "figcaption", "figure",
            //  "footer", "header", "hgroup", "listing", "main", "menu", "nav",
            //  "ol", "pre", "search", "section", "summary", "ul""
            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element with the same tag name as that
                //  of the token, then this is a parse error; ignore the token."
                if !self.in_scope(name) {
                    self.parse_error(token);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(token);
                }
                self.pop_until(name);
            }

            // "An end tag whose tag name is "form""
            "form" => self.in_body_end_form(token),

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in
                //  button scope, then this is a parse error; insert an HTML
                //  element for a "p" start tag token with no attributes."
                if !self.in_button_scope("p") {
                    self.parse_error(token);
                    let _ = self.insert_html_element_named("p");
                }
                // "Close a p element."
                self.close_element("p");
            }

            // "An end tag whose tag name is "li""
            "li" => {
                if self
                    .stack_of_open_elements
                    .in_list_item_scope(&self.tree, "li")
                {
                    self.close_element("li");
                } else {
                    self.parse_error(token);
                }
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if self.in_scope(name) {
                    self.close_element(name);
                } else {
                    self.parse_error(token);
                }
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element and whose tag name is one of
                //  "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                //  error; ignore the token."
                if !self
                    .stack_of_open_elements
                    .in_scope_any(&self.tree, HEADINGS)
                {
                    self.parse_error(token);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(token);
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            //  "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            //  "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if FORMATTING_ELEMENTS.contains(&name) => {
                if !self.run_adoption_agency(token) {
                    self.any_other_end_tag(token);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            //  "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(name) {
                    self.parse_error(token);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(token);
                }
                self.pop_until(name);
                self.active_formatting_elements.clear_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            //  described in the next entry; i.e. act as if this was a "br"
            //  start tag token with no attributes, rather than the end tag
            //  token that it actually is."
            "br" => {
                self.parse_error(token);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_empty(&Token::start_tag("br"));
                self.frameset_ok = false;
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(token),
        }
    }

    /// The shared checks of `</body>` and `</html>`. Returns whether the
    /// token closes the body.
    fn close_body(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a body element in
        //  scope, this is a parse error; ignore the token."
        if !self.in_scope("body") {
            self.parse_error(token);
            return false;
        }
        // "Otherwise, if there is a node in the stack of open elements that is
        //  not either a dd element, ... the body element, or the html element,
        //  then this is a parse error."
        if self
            .stack_of_open_elements
            .on_stack_not(&self.tree, END_OF_BODY_ALLOWED)
        {
            self.parse_error(token);
        }
        true
    }

    fn in_body_end_form(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        //  run these substeps:"
        if !self.template_on_stack() {
            // STEP 1: "Let node be the element that the form element pointer is
            //          set to, or null if it is not set to an element."
            // STEP 2: "Set the form element pointer to null."
            let node = self.form_element_pointer.take();
            // STEP 3: "If node is null or if the stack of open elements does not
            //          have node in scope, then this is a parse error; return
            //          and ignore the token."
            let Some(node) = node.filter(|&node| {
                self.stack_of_open_elements
                    .node_in_scope(&self.tree, node)
            }) else {
                self.parse_error(token);
                return;
            };
            // STEP 4: "Generate implied end tags."
            self.generate_implied_end_tags(None);
            // STEP 5: "If the current node is not node, then this is a parse
            //          error."
            if self.current_node() != Some(node) {
                self.parse_error(token);
            }
            // STEP 6: "Remove node from the stack of open elements."
            let _ = self.stack_of_open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        //  run these substeps instead:"
        if !self.in_scope("form") {
            self.parse_error(token);
            return;
        }
        self.generate_implied_end_tags(None);
        if !self.current_node_is("form") {
            self.parse_error(token);
        }
        self.pop_until("form");
    }

    /// The loop shared by `li`, `dd` and `dt` start tags: close the nearest
    /// open list item named in `closes`, stopping at special elements other
    /// than `address`, `div` and `p`.
    fn close_list_item(&mut self, token: &Token, closes: &[&str]) {
        let nodes: Vec<_> = self.stack_of_open_elements.iter().rev().collect();
        for node in nodes {
            if let Some(name) = self.html_tag_name(node)
                && closes.contains(&name)
            {
                let name = name.to_string();
                self.generate_implied_end_tags(Some(&name));
                if !self.current_node_is(&name) {
                    self.parse_error(token);
                }
                self.pop_until(&name);
                return;
            }
            let stops = self.element(node).is_some_and(|element| {
                is_special(element)
                    && !(element.is_html()
                        && matches!(element.tag_name.as_str(), "address" | "div" | "p"))
            });
            if stops {
                return;
            }
        }
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.push_active_formatting_element(element);
    }

    /// The body element, when it is the second entry of the stack.
    fn second_element_if_body(&self) -> Option<NodeId> {
        self.stack_of_open_elements
            .get(1)
            .filter(|&node| self.html_tag_name(node) == Some("body"))
    }
}
