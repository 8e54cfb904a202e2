use weft_dom::Namespace;

use super::core::{HTMLParser, is_whitespace};
use super::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    adjust_svg_tag_name, is_breakout_token, is_html_integration_point,
    is_mathml_text_integration_point,
};
use crate::tokenizer::{Token, TokenSource};

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn handle_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not
            //  ok"."
            Token::Character { data, cdata } => {
                if data.contains('\0') {
                    self.parse_error(token);
                    self.insert_characters(&data.replace('\0', "\u{FFFD}"), *cdata);
                } else {
                    self.insert_characters(data, *cdata);
                }
                if data.chars().any(|c| c != '\0' && !is_whitespace(c)) {
                    self.frameset_ok = false;
                }
            }

            // "A comment token"
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(token),

            // "A start tag whose tag name is one of: "b", "big", ... "var""
            // "A start tag whose tag name is "font", if the token has any
            //  attributes named "color", "face", or "size""
            // "An end tag whose tag name is "br", "p""
            _ if is_breakout_token(token) => {
                // "Parse error."
                self.parse_error(token);
                // "While the current node is not a MathML text integration
                //  point, an HTML integration point, or an element in the HTML
                //  namespace, pop elements from the stack of open elements."
                while let Some(current) = self.current_node() {
                    let leaves_foreign = self.element(current).is_none_or(|element| {
                        element.is_html()
                            || is_mathml_text_integration_point(element)
                            || is_html_integration_point(element)
                    });
                    if leaves_foreign {
                        break;
                    }
                    self.pop_current_node();
                }
                // "Reprocess the token according to the rules given in the
                //  section corresponding to the current insertion mode in HTML
                //  content."
                self.process_token(token);
            }

            // "Any other start tag"
            Token::StartTag { .. } => self.foreign_start_tag(token),

            // "An end tag whose tag name is "script", if the current node is an
            //  SVG script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. }
                if name == "script"
                    && self
                        .current_node()
                        .and_then(|node| self.element(node))
                        .is_some_and(|element| {
                            element.namespace == Namespace::Svg && element.tag_name == "script"
                        }) =>
            {
                self.pop_current_node();
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.foreign_end_tag(token, name),

            // Only reachable through the dispatcher for foreign content, which
            // routes end-of-file to the insertion mode.
            Token::EndOfFile => self.process_token(token),
        }
    }

    /// "Any other start tag"
    fn foreign_start_tag(&mut self, token: &Token) {
        // "If the adjusted current node is an element in the MathML namespace,
        //  adjust MathML attributes for the token."
        // "If the adjusted current node is an element in the SVG namespace,
        //  and the token's tag name is one of the ones in the first column of
        //  the following table, change the tag name to the name given in the
        //  corresponding cell in the second column."
        // "If the adjusted current node is an element in the SVG namespace,
        //  adjust SVG attributes for the token."
        // "Adjust foreign attributes for the token."
        let namespace = self
            .adjusted_current_node()
            .and_then(|node| self.element(node))
            .map_or(Namespace::Html, |element| element.namespace);

        let mut adjusted = token.clone();
        if let Token::StartTag {
            name, attributes, ..
        } = &mut adjusted
        {
            match namespace {
                Namespace::MathMl => adjust_mathml_attributes(attributes),
                Namespace::Svg => {
                    *name = adjust_svg_tag_name(name).to_string();
                    adjust_svg_attributes(attributes);
                }
                Namespace::Html => {}
            }
            adjust_foreign_attributes(attributes);
        }

        // "Insert a foreign element for the token, with adjusted current
        //  node's namespace and false."
        // "If the token has its self-closing flag set, pop the current node
        //  off the stack of open elements and acknowledge the token's
        //  self-closing flag."
        let _ = self.insert_foreign_element(&adjusted, namespace);
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, token: &Token, name: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not
        //          the same as the tag name of the token, then this is a parse
        //          error."
        if !self.tag_name_matches(index, name) {
            self.parse_error(token);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            //          open elements, then return. (fragment case)"
            if index == 0 {
                return;
            }
            // STEP 4: "If node's tag name, converted to ASCII lowercase, is
            //          the same as the tag name of the token, pop elements from
            //          the stack of open elements until node has been popped
            //          from the stack, and then return."
            if self.tag_name_matches(index, name) {
                if let Some(node) = self.stack_of_open_elements.get(index) {
                    self.pop_until_node(node);
                }
                return;
            }
            // STEP 5: "Set node to the previous entry in the stack of open
            //          elements."
            index -= 1;

            // STEP 6: "If node is not an element in the HTML namespace, return
            //          to the step labeled loop."
            // STEP 7: "Otherwise, process the token according to the rules
            //          given in the section corresponding to the current
            //          insertion mode in HTML content."
            let is_html = self
                .stack_of_open_elements
                .get(index)
                .and_then(|node| self.element(node))
                .is_some_and(|element| element.is_html());
            if is_html {
                self.using_rules_for(self.insertion_mode, token);
                return;
            }
        }
    }

    fn tag_name_matches(&self, index: usize, name: &str) -> bool {
        self.stack_of_open_elements
            .get(index)
            .and_then(|node| self.element(node))
            .is_some_and(|element| element.tag_name.eq_ignore_ascii_case(name))
    }
}
