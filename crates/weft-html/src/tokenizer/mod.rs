//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// HTML tokenizer state machine implementation.
pub mod core;
/// Character reference parsing per § 13.2.5.72.
pub mod character_reference;
/// DOCTYPE public and system identifier states.
mod doctype_states;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Script data escaped and double-escaped states.
mod script_states;
/// Token types produced by the tokenizer.
pub mod token;

pub use token::{Attribute, Token};
pub use self::core::{HTMLTokenizer, TokenizerState};

/// The pull interface the tree builder drives.
///
/// [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
///
/// "The tree construction stage can affect the tokenizer": it switches the
/// tokenizer state for raw text elements, injects tokens, and reports its own
/// parse errors through the same sink.
pub trait TokenSource {
    /// Next token; [`Token::EndOfFile`] forever once input is exhausted.
    fn next_token(&mut self) -> Token;

    /// Switch the tokenizer to `state` before the next token is read.
    fn request_state(&mut self, state: TokenizerState);

    /// Queue `token` so it is returned by the next [`Self::next_token`] call.
    fn emit(&mut self, token: Token);

    /// Record a tree construction parse error.
    fn report_error(&mut self, message: String);

    /// Whether `<![CDATA[` opens a CDATA section (adjusted current node is
    /// foreign) or a bogus comment.
    fn set_cdata_allowed(&mut self, allowed: bool);
}

impl TokenSource for HTMLTokenizer {
    fn next_token(&mut self) -> Token {
        Self::next_token(self)
    }

    fn request_state(&mut self, state: TokenizerState) {
        Self::request_state(self, state);
    }

    fn emit(&mut self, token: Token) {
        Self::emit(self, token);
    }

    fn report_error(&mut self, message: String) {
        Self::report_error(self, message);
    }

    fn set_cdata_allowed(&mut self, allowed: bool) {
        Self::set_cdata_allowed(self, allowed);
    }
}
