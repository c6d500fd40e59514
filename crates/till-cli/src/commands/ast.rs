//! AST dump command - output AST as JSON

use anyhow::Result;
use till_runtime::ast::VersionedProgram;
use till_runtime::{Lexer, Parser};

use super::{read_source, report};

/// Parse the source file and print the versioned AST as JSON
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = read_source(file_path)?;

    let tokens = Lexer::new(&source)
        .tokenize()
        .map_err(|e| report(e.to_diagnostic(), &source, file_path, json))?;
    let program = Parser::new(tokens)
        .parse()
        .map_err(|e| report(e.to_diagnostic(), &source, file_path, json))?;

    println!("{}", VersionedProgram::new(program).to_json()?);
    Ok(())
}
