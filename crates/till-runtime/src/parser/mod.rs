//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an Abstract Syntax Tree (AST).
//! Statements are parsed by recursive descent over the layout tokens produced
//! by the lexer; expressions use one left-associative loop per precedence level.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::{Diagnostic, Phase};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use thiserror::Error;

/// How an `Indent` token is described when it shows up where a statement belongs
const INDENTATION: &str = "indentation";

/// Deepest nesting of blocks, groups, calls, operators and operands accepted
pub const MAX_NESTING_DEPTH: usize = 256;

/// How input past `MAX_NESTING_DEPTH` is described
const TOO_DEEP: &str = "deeper nesting";

/// Syntax error: what the grammar allowed at a position versus what was there
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found} at {span}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub span: Span,
}

impl ParseError {
    /// Diagnostic code (TL2xxx)
    pub fn code(&self) -> &'static str {
        if self.is_unexpected_indentation() {
            "TL2002"
        } else if self.is_too_deep() {
            "TL2003"
        } else {
            "TL2001"
        }
    }

    /// Nesting went past `MAX_NESTING_DEPTH`
    pub fn is_too_deep(&self) -> bool {
        self.found == TOO_DEEP
    }

    /// A line indented deeper than its context without opening a block
    pub fn is_unexpected_indentation(&self) -> bool {
        self.found == INDENTATION
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag =
            Diagnostic::error_with_code(Phase::Parse, self.code(), self.to_string(), self.span);
        if self.is_unexpected_indentation() {
            diag.with_label("unexpected indentation")
                .with_help("only the body of `if`, `while` or a function is indented")
        } else if self.is_too_deep() {
            diag.with_label("nested too deeply")
                .with_help("split the expression using intermediate variables")
        } else {
            diag.with_label("syntax error")
                .with_help("check your syntax for typos or missing tokens")
        }
    }
}

/// Human-readable description of a token for error messages
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier => format!("identifier '{}'", token.lexeme),
        TokenKind::Number => format!("number {}", token.lexeme),
        TokenKind::String => "string literal".to_string(),
        TokenKind::Char => "character literal".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        TokenKind::Indent => INDENTATION.to_string(),
        TokenKind::Dedent => "end of block".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        kind => format!("'{}'", kind.as_str()),
    }
}

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    /// Open nesting levels at the current position
    pub(super) depth: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// An `Eof` token is appended if the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end, t.span.line, t.span.column))
                .unwrap_or_else(Span::dummy);
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let statements = self.parse_chunk()?;
        if !self.is_at_end() {
            return Err(self.error("a statement"));
        }
        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    // === Chunks and blocks ===

    /// Parse statements until the end of the enclosing block or input
    pub(super) fn parse_chunk(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse an indented block: `NEWLINE INDENT chunk DEDENT`
    pub(super) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.consume(TokenKind::Newline, "end of line before an indented block")?;
        self.consume(TokenKind::Indent, "an indented block")?;

        self.enter()?;
        let statements = self.parse_chunk()?;
        self.leave();
        let (first, last) = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => (first.span(), last.span()),
            _ => return Err(self.error("a statement")),
        };

        self.consume(TokenKind::Dedent, "end of block")?;
        Ok(Block {
            statements,
            span: first.merge(last),
        })
    }

    // === Helper methods ===

    /// Open a nesting level, failing past `MAX_NESTING_DEPTH`
    pub(super) fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let mut err = self.error(&format!(
                "at most {} levels of nesting",
                MAX_NESTING_DEPTH
            ));
            err.found = TOO_DEEP.to_string();
            return Err(err);
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Advance to next token and return reference to previous
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Kind of the token after the current one
    pub(super) fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or error
    pub(super) fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    /// Consume an identifier token
    pub(super) fn consume_identifier(&mut self, context: &str) -> Result<Identifier, ParseError> {
        let token = self.consume(TokenKind::Identifier, context)?;
        Ok(Identifier {
            name: token.lexeme.clone(),
            span: token.span,
        })
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Build an error at the current token
    pub(super) fn error(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            expected: expected.to_string(),
            found: describe(token),
            span: token.span,
        }
    }
}

/// Convenience: lex and parse a source string
#[cfg(test)]
pub(crate) fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = crate::lexer::Lexer::new(source)
        .tokenize()
        .expect("test source should lex");
    Parser::new(tokens).parse()
}
