//! Property tests: layout token balance and formatter round-trip

use proptest::prelude::*;
use serde_json::Value as Json;
use till_formatter::{format_program, FormatConfig};
use till_runtime::ast::Program;
use till_runtime::lexer::Lexer;
use till_runtime::parser::Parser;
use till_runtime::token::TokenKind;

fn parse(source: &str) -> Program {
    let tokens = Lexer::new(source)
        .tokenize()
        .unwrap_or_else(|e| panic!("lex error in {:?}: {}", source, e));
    Parser::new(tokens)
        .parse()
        .unwrap_or_else(|e| panic!("parse error in {:?}: {}", source, e))
}

/// AST as JSON with every span replaced by null
fn without_spans(program: &Program) -> Json {
    fn strip(value: &mut Json) {
        match value {
            Json::Object(map) => {
                let is_span = map.len() == 4
                    && ["start", "end", "line", "column"]
                        .iter()
                        .all(|k| map.contains_key(*k));
                if is_span {
                    *value = Json::Null;
                } else {
                    map.values_mut().for_each(strip);
                }
            }
            Json::Array(items) => items.iter_mut().for_each(strip),
            _ => {}
        }
    }
    let mut json = serde_json::to_value(program).expect("AST serializes");
    strip(&mut json);
    json
}

fn expr_source() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..100, 1u32..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
        Just("x".to_string()),
        Just("true".to_string()),
        Just("'c'".to_string()),
        Just("\"s\\n\"".to_string()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "==", "<", ">"]),
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("~{}", e)),
            inner.clone().prop_map(|e| format!("!{}", e)),
            prop::collection::vec(inner, 0..3).prop_map(|args| format!("f({})", args.join(", "))),
        ]
    })
}

fn program_source() -> impl Strategy<Value = String> {
    prop::collection::vec((expr_source(), 0u8..4), 1..6).prop_map(|stmts| {
        let mut source = String::new();
        for (expr, form) in stmts {
            match form {
                0 => source.push_str(&format!("display {}\n", expr)),
                1 => source.push_str(&format!("Num v = {}\n", expr)),
                2 => source.push_str(&format!("if {}\n  x = {}\n", expr, expr)),
                _ => source.push_str(&format!("g(Num a, Str b) -> Bool\n   while {}\n      return {}\n   return true\n", expr, expr)),
            }
        }
        source
    })
}

proptest! {
    #[test]
    fn indents_and_dedents_balance(lines in prop::collection::vec((0usize..10, prop::bool::ANY), 0..25)) {
        let source: String = lines
            .iter()
            .map(|(width, comment)| {
                let body = if *comment { "// note" } else { "display 1" };
                format!("{}{}\n", " ".repeat(*width), body)
            })
            .collect();

        if let Ok(tokens) = Lexer::new(&source).tokenize() {
            let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
            let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
            prop_assert_eq!(indents, dedents);
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        }
    }

    #[test]
    fn formatting_preserves_the_ast(source in program_source(), indent in 1usize..6) {
        let original = parse(&source);
        let config = FormatConfig::default().with_indent_size(indent);
        let formatted = format_program(&original, &config);
        let reparsed = parse(&formatted);
        prop_assert_eq!(without_spans(&original), without_spans(&reparsed));
    }
}
