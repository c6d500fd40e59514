//! Lexer integration tests: tokens, layout and lexical errors

mod common;

use common::*;
#[allow(unused_imports)]
use common::assert_eq;
use rstest::rstest;
use till_runtime::lexer::{LexError, Lexer};
use till_runtime::token::TokenKind::{self, *};

#[rstest]
#[case("Num x = 1", vec![Identifier, Identifier, Equal, Number, Newline, Eof])]
#[case("display ~a", vec![Display, Tilde, Identifier, Newline, Eof])]
#[case("f(Num a) -> Bool", vec![Identifier, LeftParen, Identifier, Identifier, RightParen, Arrow, Identifier, Newline, Eof])]
#[case("a == b < c > d", vec![Identifier, EqualEqual, Identifier, Less, Identifier, Greater, Identifier, Newline, Eof])]
#[case("x = 'c' // note", vec![Identifier, Equal, Char, Newline, Eof])]
#[case("while true\n    return", vec![While, True, Newline, Indent, Return, Newline, Dedent, Eof])]
fn test_token_kinds(#[case] source: &str, #[case] expected: Vec<TokenKind>) {
    assert_eq!(kinds(source), expected);
}

#[test]
fn test_empty_and_blank_sources() {
    assert_eq!(kinds(""), vec![Eof]);
    assert_eq!(kinds("\n\n   \n// only a comment\n"), vec![Eof]);
}

#[test]
fn test_nested_blocks_close_at_end_of_input() {
    let source = "if a\n    if b\n        display 1";
    let tokens = kinds(source);
    let indents = tokens.iter().filter(|k| **k == Indent).count();
    let dedents = tokens.iter().filter(|k| **k == Dedent).count();
    assert_eq!(indents, 2);
    assert_eq!(dedents, 2);
    assert_eq!(&tokens[tokens.len() - 3..], &[Dedent, Dedent, Eof]);
}

#[test]
fn test_dedent_by_several_levels() {
    let source = "if a\n    if b\n        display 1\ndisplay 2\n";
    let tokens = kinds(source);
    let pos = tokens.iter().position(|k| *k == Dedent).unwrap();
    assert_eq!(&tokens[pos..pos + 3], &[Dedent, Dedent, Display]);
}

#[test]
fn test_blank_lines_inside_blocks_are_ignored() {
    let with_blank = kinds("if a\n    display 1\n\n    display 2\n");
    let without = kinds("if a\n    display 1\n    display 2\n");
    assert_eq!(with_blank, without);
}

#[test]
fn test_literal_values() {
    let tokens = lex("\"a\\tb\" 'q' 3.25");
    assert_eq!(tokens[0].lexeme, "a\tb");
    assert_eq!(tokens[1].lexeme, "q");
    assert_eq!(tokens[2].lexeme, "3.25");
}

#[test]
fn test_positions_are_one_based() {
    let tokens = lex("Num x\n  x = 1");
    assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
    let x = tokens.iter().filter(|t| t.lexeme == "x").nth(1).unwrap();
    assert_eq!((x.span.line, x.span.column), (2, 3));
}

#[test]
fn test_inconsistent_dedent_names_position() {
    let err = Lexer::new("if a\n    display 1\n  display 2\n")
        .tokenize()
        .unwrap_err();
    match &err {
        LexError::InconsistentDedent { width, span } => {
            assert_eq!(*width, 2);
            assert_eq!(span.line, 3);
        }
        other => panic!("expected InconsistentDedent, got {:?}", other),
    }
    assert_eq!(err.code(), "TL1006");
    assert!(err.to_string().contains("3:"));
}

#[rstest]
#[case("display @", "TL1001")]
#[case("display \"open", "TL1002")]
#[case("display 'a", "TL1003")]
#[case("display \"\\q\"", "TL1004")]
#[case("display ''", "TL1005")]
#[case("display 'ab'", "TL1005")]
#[case("if a\n\tdisplay 1", "TL1007")]
fn test_lexical_errors(#[case] source: &str, #[case] code: &str) {
    let err = Lexer::new(source).tokenize().unwrap_err();
    assert_eq!(err.code(), code, "{}", err);
}

#[test]
fn test_oversized_number_literal_is_rejected() {
    let source = format!("Num big = {}\n", "1".repeat(320));
    let err = Lexer::new(&source).tokenize().unwrap_err();
    assert_eq!(err.code(), "TL1008");
    assert_eq!(err.span().line, 1);
    assert_eq!(err.span().column, 11);
}

#[test]
fn test_lex_diagnostic_has_snippet() {
    let diag = Lexer::new("Num x = 1\ndisplay @\n")
        .tokenize()
        .unwrap_err()
        .to_diagnostic()
        .with_source("Num x = 1\ndisplay @\n");
    assert_eq!(diag.line, 2);
    assert_eq!(diag.column, 9);
    assert_eq!(diag.snippet, "display @");
}
