//! DOCTYPE identifier states.
//!
//! [§ 13.2.5.56 - § 13.2.5.68](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)

use super::core::{HTMLTokenizer, TokenizerState};

impl HTMLTokenizer {
    /// Set force-quirks on the current DOCTYPE token.
    fn force_quirks(&mut self) {
        if let Some(ref mut token) = self.current_token {
            token.set_force_quirks();
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.log_parse_error();
        self.force_quirks();
        self.emit_token();
        self.emit_eof_token();
        self.at_eof = true;
    }

    /// "This is an abrupt-doctype-...-identifier parse error. Set the current
    /// DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
    /// the current DOCTYPE token."
    fn abrupt_doctype_end(&mut self) {
        self.log_parse_error();
        self.force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// "This is a missing-quote-before-doctype-...-identifier parse error. Set the
    /// current DOCTYPE token's force-quirks flag to on. Reconsume in the bogus
    /// DOCTYPE state."
    fn reconsume_in_bogus_doctype(&mut self) {
        self.log_parse_error();
        self.force_quirks();
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "If the six characters starting from the current input character are an
            // ASCII case-insensitive match for the word "PUBLIC", then consume those
            // characters and switch to the after DOCTYPE public keyword state."
            //
            // "Otherwise, if the six characters starting from the current input
            // character are an ASCII case-insensitive match for the word "SYSTEM",
            // then consume those characters and switch to the after DOCTYPE system
            // keyword state."
            //
            // "Otherwise, this is an invalid-character-sequence-after-doctype-name
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(c) => {
                // The current character is already consumed; look at the rest.
                let public = c.eq_ignore_ascii_case(&'P')
                    && self.next_few_characters_are_case_insensitive("UBLIC");
                let system = c.eq_ignore_ascii_case(&'S')
                    && self.next_few_characters_are_case_insensitive("YSTEM");
                if public {
                    self.consume_string("UBLIC");
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if system {
                    self.consume_string("YSTEM");
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    self.reconsume_in_bogus_doctype();
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        match self.current_input_character {
            // "Switch to the before DOCTYPE public identifier state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEPublicIdentifier);
            }
            // "This is a missing-whitespace-after-doctype-public-keyword parse error.
            // Set the current DOCTYPE token's public identifier to the empty string
            // (not missing), then switch to the DOCTYPE public identifier
            // (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error();
                self.begin_public_identifier(quote);
            }
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_public_identifier(quote),
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    fn begin_public_identifier(&mut self, quote: char) {
        if let Some(ref mut token) = self.current_token {
            token.set_public_identifier_empty();
        }
        if quote == '"' {
            self.switch_to(TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted);
        } else {
            self.switch_to(TokenizerState::DOCTYPEPublicIdentifierSingleQuoted);
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE public identifier state."
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier);
            }
            Some('\0') => {
                self.log_parse_error();
                if let Some(ref mut token) = self.current_token {
                    token.append_to_public_identifier('\u{FFFD}');
                }
            }
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_public_identifier(c);
                }
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "This is a missing-whitespace-between-doctype-public-and-system-identifiers
            // parse error."
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error();
                self.begin_system_identifier(quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPESystemIdentifier);
            }
            // "This is a missing-whitespace-after-doctype-system-keyword parse error."
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error();
                self.begin_system_identifier(quote);
            }
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(_) => self.reconsume_in_bogus_doctype(),
        }
    }

    fn begin_system_identifier(&mut self, quote: char) {
        if let Some(ref mut token) = self.current_token {
            token.set_system_identifier_empty();
        }
        if quote == '"' {
            self.switch_to(TokenizerState::DOCTYPESystemIdentifierDoubleQuoted);
        } else {
            self.switch_to(TokenizerState::DOCTYPESystemIdentifierSingleQuoted);
        }
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier);
            }
            Some('\0') => {
                self.log_parse_error();
                if let Some(ref mut token) = self.current_token {
                    token.append_to_system_identifier('\u{FFFD}');
                }
            }
            Some('>') => self.abrupt_doctype_end(),
            None => self.eof_in_doctype(),
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_system_identifier(c);
                }
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            // "Switch to the data state. Emit the DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "This is an unexpected-null-character parse error. Ignore the character."
            Some('\0') => self.log_parse_error(),
            // "Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_token();
                self.emit_eof_token();
                self.at_eof = true;
            }
            // "Ignore the character."
            Some(_) => {}
        }
    }
}
