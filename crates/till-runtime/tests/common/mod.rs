//! Shared helpers for Till integration tests

#![allow(dead_code)]

use till_runtime::lexer::Lexer;
use till_runtime::token::{Token, TokenKind};
use till_runtime::{RuntimeConfig, Till, TillError};

pub use pretty_assertions::{assert_eq, assert_ne};

/// Run a program that must succeed and return its displayed texts
pub fn run_ok(source: &str) -> Vec<String> {
    match Till::new().run(source) {
        Ok(outputs) => outputs.into_iter().map(|o| o.text).collect(),
        Err(e) => panic!("program failed: {}\n{}", e, e.to_diagnostic().to_human_string()),
    }
}

/// Run a program with a custom call depth limit
pub fn run_with_depth(source: &str, max_call_depth: usize) -> Result<Vec<String>, TillError> {
    let config = RuntimeConfig {
        max_call_depth,
        ..RuntimeConfig::default()
    };
    Till::with_config(config)
        .run(source)
        .map(|outputs| outputs.into_iter().map(|o| o.text).collect())
}

/// Run a program that must fail
pub fn run_err(source: &str) -> TillError {
    match Till::new().run(source) {
        Ok(outputs) => panic!("expected an error, got outputs {:?}", outputs),
        Err(e) => e,
    }
}

/// Assert that source fails with the given diagnostic code
pub fn assert_error_code(source: &str, expected_code: &str) {
    let err = run_err(source);
    assert_eq!(
        err.to_diagnostic().code,
        expected_code,
        "wrong code for {:?}: {}",
        source,
        err
    );
}

/// Tokenize source that must lex
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .tokenize()
        .unwrap_or_else(|e| panic!("lex error: {}", e))
}

/// Token kinds of source that must lex
pub fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}
