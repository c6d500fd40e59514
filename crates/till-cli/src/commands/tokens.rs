//! Tokens command - print the lexer's output

use anyhow::Result;
use till_runtime::{Lexer, Token};

use super::{read_source, report};

/// Print one token per line as `line:column Kind "lexeme"`
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = read_source(file_path)?;

    let tokens = Lexer::new(&source)
        .tokenize()
        .map_err(|e| report(e.to_diagnostic(), &source, file_path, json))?;

    for token in &tokens {
        println!("{}", describe(token));
    }
    Ok(())
}

fn describe(token: &Token) -> String {
    if token.kind.is_layout() || token.lexeme.is_empty() {
        format!("{} {:?}", token.span, token.kind)
    } else {
        format!("{} {:?} {:?}", token.span, token.kind, token.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let tokens = Lexer::new("Num x\n").tokenize().unwrap();
        let lines: Vec<String> = tokens.iter().map(describe).collect();
        assert_eq!(
            lines,
            vec![
                "1:1 Identifier \"Num\"",
                "1:5 Identifier \"x\"",
                "1:6 Newline",
                "2:1 Eof",
            ]
        );
    }
}
