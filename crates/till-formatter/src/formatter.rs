//! Formatter core - configuration and entry point

use serde::{Deserialize, Serialize};
use till_runtime::diagnostic::Diagnostic;
use till_runtime::lexer::Lexer;
use till_runtime::parser::Parser;

use crate::visitor::FormatVisitor;

/// Formatter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Number of spaces per indentation level (default: 4)
    pub indent_size: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_size: 4 }
    }
}

impl FormatConfig {
    /// Create config with custom indent size
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }
}

/// Result of formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatResult {
    /// Successfully formatted code
    Ok(String),
    /// Source does not lex or parse
    Error(Diagnostic),
}

/// The main formatter
pub struct Formatter {
    config: FormatConfig,
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    /// Format source code, returning the formatted string or the first syntax error
    pub fn format(&mut self, source: &str) -> FormatResult {
        let tokens = match Lexer::new(source).tokenize() {
            Ok(tokens) => tokens,
            Err(e) => return FormatResult::Error(e.to_diagnostic().with_source(source)),
        };

        let program = match Parser::new(tokens).parse() {
            Ok(program) => program,
            Err(e) => return FormatResult::Error(e.to_diagnostic().with_source(source)),
        };

        let mut visitor = FormatVisitor::new(self.config.clone());
        visitor.visit_program(&program);
        FormatResult::Ok(visitor.into_output())
    }
}
