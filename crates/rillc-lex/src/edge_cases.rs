//! Edge case tests for the lexer.

use crate::{lex, TokenKind};
use rillc_util::{Arena, Diagnostics};

fn kinds(source: &str) -> Vec<TokenKind> {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    lex(&arena, source, &mut diags)
        .tokens
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn keyword_prefix_is_identifier() {
    // Identifiers that merely start with a keyword must not match it.
    assert_eq!(
        kinds("iffy whileX return_ fortune"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn underscore_identifiers() {
    assert_eq!(
        kinds("_ _x x_ _1"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn adjacent_operators_longest_match() {
    // "+++" is "++" then "+"
    assert_eq!(
        kinds("+++"),
        vec![TokenKind::PlusPlus, TokenKind::Plus, TokenKind::Eof]
    );
    // "-->" is "--" then ">"
    assert_eq!(
        kinds("-->"),
        vec![TokenKind::MinusMinus, TokenKind::Gt, TokenKind::Eof]
    );
    // "<==" is "<=" then "="
    assert_eq!(
        kinds("<=="),
        vec![TokenKind::LtEq, TokenKind::Assign, TokenKind::Eof]
    );
}

#[test]
fn comment_at_eof_without_newline() {
    assert_eq!(kinds("x // no newline"), vec![TokenKind::Identifier, TokenKind::Eof]);
}

#[test]
fn block_comment_containing_stars() {
    assert_eq!(
        kinds("a /* * ** *** */ b"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn block_comments_do_not_nest() {
    // The first "*/" closes the comment; the rest is ordinary tokens.
    let result = kinds("/* outer /* inner */ tail */");
    assert_eq!(
        result,
        vec![
            TokenKind::Identifier, // tail
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn empty_string_literal() {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    let lexed = lex(&arena, r#""""#, &mut diags);
    assert_eq!(lexed.tokens[0].kind, TokenKind::StringLit);
    let record = lexed.tokens[0].string_record().unwrap();
    assert_eq!(lexed.strings.get(record), Some(""));
}

#[test]
fn escaped_quote_does_not_close_string() {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    let lexed = lex(&arena, r#""a\"b""#, &mut diags);
    assert_eq!(lexed.tokens[0].kind, TokenKind::StringLit);
    let record = lexed.tokens[0].string_record().unwrap();
    assert_eq!(lexed.strings.get(record), Some("a\"b"));
}

#[test]
fn unknown_escape_in_char_falls_through() {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    let lexed = lex(&arena, r"'\q'", &mut diags);
    assert_eq!(lexed.tokens[0].kind, TokenKind::CharLit);
    assert_eq!(lexed.tokens[0].char_value(), Some('q'));
}

#[test]
fn number_glued_to_identifier() {
    // "12ab" lexes as IntLit then Identifier; rejecting it is the parser's
    // business if it ever matters.
    assert_eq!(
        kinds("12ab"),
        vec![TokenKind::IntLit, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn float_needs_digits_on_both_sides() {
    assert_eq!(
        kinds(".5"),
        vec![TokenKind::Dot, TokenKind::IntLit, TokenKind::Eof]
    );
    assert_eq!(
        kinds("5."),
        vec![TokenKind::IntLit, TokenKind::Dot, TokenKind::Eof]
    );
    assert_eq!(kinds("0.5"), vec![TokenKind::FloatLit, TokenKind::Eof]);
}

#[test]
fn crlf_line_counting() {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    let lexed = lex(&arena, "a\r\nb", &mut diags);
    assert_eq!(lexed.tokens[1].span.start_line, 2);
}

#[test]
fn every_token_spans_forward() {
    let arena = Arena::new();
    let mut diags = Diagnostics::new("edge.rl");
    let source = "fn f(a: i32) -> i64 { x: i32[3] = {1, 2, 3}; return a; }";
    let lexed = lex(&arena, source, &mut diags);
    for tok in &lexed.tokens {
        assert!(tok.span.is_ordered(), "unordered span on {:?}", tok.kind);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn identifiers_always_lex_as_one_token(
            name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}",
        ) {
            let arena = Arena::new();
            let mut diags = Diagnostics::new("prop.rl");
            let lexed = lex(&arena, &name, &mut diags);
            // Either the whole lexeme is a keyword or it is one identifier.
            prop_assert_eq!(lexed.tokens.len(), 2);
            prop_assert_eq!(lexed.tokens[0].lexeme, name.as_str());
        }

        #[test]
        fn integer_digits_lex_as_int_literal(n in 0u64..=u64::MAX) {
            let arena = Arena::new();
            let mut diags = Diagnostics::new("prop.rl");
            let text = n.to_string();
            let lexed = lex(&arena, &text, &mut diags);
            prop_assert_eq!(lexed.tokens[0].kind, TokenKind::IntLit);
            prop_assert_eq!(lexed.tokens[0].lexeme, text.as_str());
        }

        #[test]
        fn lexing_never_panics(source in "\\PC{0,100}") {
            let arena = Arena::new();
            let mut diags = Diagnostics::new("prop.rl");
            let lexed = lex(&arena, &source, &mut diags);
            prop_assert_eq!(
                lexed.tokens.last().map(|t| t.kind),
                Some(TokenKind::Eof)
            );
        }
    }
}
