use super::core::{HTMLParser, InsertionMode};
use crate::tokenizer::{Token, TokenSource};

impl<S: TokenSource> HTMLParser<S> {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(super) fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token" / "A comment token" / "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.using_rules_for(InsertionMode::InBody, token);
            }

            Token::StartTag { name, .. } => {
                let mode = match name.as_str() {
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                    | "style" | "template" | "title" => {
                        self.using_rules_for(InsertionMode::InHead, token);
                        return;
                    }
                    // "A start tag whose tag name is one of: "caption",
                    //  "colgroup", "tbody", "tfoot", "thead""
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    // "A start tag whose tag name is "col""
                    "col" => InsertionMode::InColumnGroup,
                    // "A start tag whose tag name is "tr""
                    "tr" => InsertionMode::InTableBody,
                    // "A start tag whose tag name is one of: "td", "th""
                    "td" | "th" => InsertionMode::InRow,
                    // "Any other start tag"
                    _ => InsertionMode::InBody,
                };
                // "Pop the current template insertion mode off the stack of
                //  template insertion modes. Push mode onto the stack of
                //  template insertion modes so that it is the new current
                //  template insertion mode. Switch the insertion mode to mode,
                //  and reprocess the token."
                let _ = self.template_insertion_modes.pop();
                self.template_insertion_modes.push(mode);
                self.switch_mode(mode);
                self.reprocess_token(token);
            }

            Token::EndTag { name, .. } if name == "template" => {
                self.using_rules_for(InsertionMode::InHead, token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                //  elements, then stop parsing. (fragment case)"
                if !self.template_on_stack() {
                    self.stop_parsing();
                    return;
                }
                // "Otherwise, this is a parse error."
                self.parse_error(token);
                // "Pop elements from the stack of open elements until a
                //  template element has been popped from the stack."
                self.pop_until("template");
                // "Clear the list of active formatting elements up to the last
                //  marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                //  template insertion modes."
                let _ = self.template_insertion_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode();
                // "Reprocess the token."
                self.reprocess_token(token);
            }
        }
    }
}
