//! Integration tests for the HTML tokenizer.

use weft_html::{Attribute, HTMLTokenizer, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input, 0).into_tokens()
}

/// Helper to tokenize a string and return the number of parse errors
fn error_count(input: &str) -> usize {
    let mut tokenizer = HTMLTokenizer::new(input, 100);
    while !tokenizer.next_token().is_eof() {}
    tokenizer.errors().len()
}

#[test]
fn test_plain_text_is_one_run() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![Token::text("Hello"), Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            ..
        } => {
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_missing_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name, &None);
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_start_tag_lowercases_names() {
    let tokens = tokenize(r#"<DIV Class="a" id=b>"#);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert_eq!(
                attributes,
                &vec![Attribute::new("class", "a"), Attribute::new("id", "b")]
            );
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_self_closing_flag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_duplicate_attributes_are_kept_by_tokenizer() {
    let tokens = tokenize(r#"<a href="1" href="2">"#);
    assert_eq!(tokens[0].attribute("href"), Some("1"));
    match &tokens[0] {
        Token::StartTag { attributes, .. } => assert_eq!(attributes.len(), 2),
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</p>");
    assert_eq!(tokens[0], Token::end_tag("p"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hi ".to_string()
        }
    );
}

#[test]
fn test_text_between_tags() {
    let tokens = tokenize("<p>one</p>two");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("p"),
            Token::text("one"),
            Token::end_tag("p"),
            Token::text("two"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_character_references_in_text() {
    let tokens = tokenize("a &amp; b &lt; &#x41;&#66;");
    assert_eq!(tokens[0], Token::text("a & b < AB"));
}

#[test]
fn test_character_reference_in_attribute() {
    let tokens = tokenize(r#"<a title="x &amp; y">"#);
    assert_eq!(tokens[0].attribute("title"), Some("x & y"));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(tokens[0], Token::text("a\nb\nc"));
}

#[test]
fn test_cdata_needs_foreign_content() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "[CDATA[x]]"));

    let mut tokenizer = HTMLTokenizer::new("<![CDATA[x<y]]>", 0);
    tokenizer.set_cdata_allowed(true);
    assert_eq!(
        tokenizer.next_token(),
        Token::Character {
            data: "x<y".to_string(),
            cdata: true
        }
    );
}

#[test]
fn test_rawtext_state_ignores_markup() {
    let mut tokenizer = HTMLTokenizer::new("<b>x</b></style>after", 0);
    tokenizer.request_state(TokenizerState::RAWTEXT);
    // No start tag was seen, so no end tag is appropriate.
    assert_eq!(tokenizer.next_token(), Token::text("<b>x</b></style>after"));
}

#[test]
fn test_injected_tokens_come_first() {
    let mut tokenizer = HTMLTokenizer::new("text", 0);
    tokenizer.emit(Token::end_tag("foo"));
    assert_eq!(tokenizer.next_token(), Token::end_tag("foo"));
    assert_eq!(tokenizer.next_token(), Token::text("text"));
    assert!(tokenizer.next_token().is_eof());
}

#[test]
fn test_parse_errors_are_counted() {
    assert_eq!(error_count("<p>fine</p>"), 0);
    // eof-in-tag
    assert_eq!(error_count("<div"), 1);
    // unexpected-null-character
    assert_eq!(error_count("a\0b"), 1);
}

#[test]
fn test_error_tracking_can_be_disabled() {
    let mut tokenizer = HTMLTokenizer::new("<div", 0);
    while !tokenizer.next_token().is_eof() {}
    assert!(tokenizer.errors().is_empty());
}
