//! Lexical analysis (tokenization)
//!
//! The lexer converts Till source code into a stream of tokens with accurate
//! span information. Leading spaces of each line are measured against a stack
//! of open indentation widths to synthesize `Indent` and `Dedent` tokens, and
//! every non-blank line is terminated by exactly one `Newline` token.

use crate::diagnostic::{Diagnostic, Phase};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use thiserror::Error;

mod literals;

/// Lexical errors. Tokenization stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    #[error("unterminated character literal starting at {span}")]
    UnterminatedChar { span: Span },

    #[error("invalid escape sequence '\\{ch}' at {span}")]
    InvalidEscape { ch: char, span: Span },

    #[error("character literal at {span} must contain exactly one character")]
    InvalidCharLiteral { span: Span },

    #[error("inconsistent dedent at {span}: indentation of {width} spaces matches no enclosing block")]
    InconsistentDedent { width: usize, span: Span },

    #[error("tab character at {span}: indentation must use spaces")]
    TabCharacter { span: Span },

    #[error("number literal at {span} is too large")]
    NumberOutOfRange { span: Span },
}

impl LexError {
    /// Location of the offending text
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedChar { span }
            | LexError::InvalidEscape { span, .. }
            | LexError::InvalidCharLiteral { span }
            | LexError::InconsistentDedent { span, .. }
            | LexError::TabCharacter { span }
            | LexError::NumberOutOfRange { span } => *span,
        }
    }

    /// Diagnostic code (TL1xxx)
    pub fn code(&self) -> &'static str {
        match self {
            LexError::UnexpectedCharacter { .. } => "TL1001",
            LexError::UnterminatedString { .. } => "TL1002",
            LexError::UnterminatedChar { .. } => "TL1003",
            LexError::InvalidEscape { .. } => "TL1004",
            LexError::InvalidCharLiteral { .. } => "TL1005",
            LexError::InconsistentDedent { .. } => "TL1006",
            LexError::TabCharacter { .. } => "TL1007",
            LexError::NumberOutOfRange { .. } => "TL1008",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error_with_code(Phase::Lex, self.code(), self.to_string(), self.span());
        match self {
            LexError::UnterminatedString { .. } => diag
                .with_label("string starts here")
                .with_help("add a closing '\"' before the end of the line"),
            LexError::UnterminatedChar { .. } => diag
                .with_label("character starts here")
                .with_help("add a closing '\\''"),
            LexError::InvalidEscape { .. } => diag
                .with_label("unknown escape")
                .with_help("valid escapes are \\n \\t \\r \\0 \\\\ \\\" \\'"),
            LexError::InvalidCharLiteral { .. } => diag
                .with_label("not a single character")
                .with_help("use a string literal for zero or several characters"),
            LexError::InconsistentDedent { .. } => diag
                .with_label("dedent to here")
                .with_help("dedent to the indentation of an enclosing block"),
            LexError::TabCharacter { .. } => diag
                .with_label("tab")
                .with_help("replace tabs with spaces"),
            LexError::NumberOutOfRange { .. } => diag
                .with_label("out of range")
                .with_help("numbers must be finite 64-bit floating point values"),
            LexError::UnexpectedCharacter { .. } => diag.with_label("not valid here"),
        }
    }
}

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    pub(super) chars: Vec<char>,
    /// Current position in chars
    pub(super) current: usize,
    /// Current line number (1-indexed)
    pub(super) line: u32,
    /// Current column number (1-indexed)
    pub(super) column: u32,
    /// Start position of current token
    pub(super) start_pos: usize,
    /// Start line of current token
    pub(super) start_line: u32,
    /// Start column of current token
    pub(super) start_column: u32,
    /// Widths of the open indentation levels, strictly increasing from 0
    indent_stack: Vec<usize>,
    /// Tokens produced so far
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            indent_stack: vec![0],
            tokens: Vec::new(),
        }
    }

    /// Tokenize the source code
    ///
    /// The returned stream always ends with a `Dedent` for every level still
    /// open, followed by `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_at_end() {
            self.scan_line()?;
        }

        self.mark_start();
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let dedent = self.make_token(TokenKind::Dedent, "");
            self.tokens.push(dedent);
        }
        let eof = self.make_token(TokenKind::Eof, "");
        self.tokens.push(eof);

        let tokens = std::mem::take(&mut self.tokens);
        tracing::debug!(tokens = tokens.len(), lines = self.line, "tokenized source");
        Ok(tokens)
    }

    /// Scan one physical line, including its terminating newline
    fn scan_line(&mut self) -> Result<(), LexError> {
        self.mark_start();
        let mut width = 0;
        while self.peek() == Some(' ') {
            self.advance();
            width += 1;
        }

        if self.rest_of_line_is_blank() {
            self.skip_line();
            return Ok(());
        }
        if self.peek() == Some('\t') {
            return Err(self.tab_error());
        }

        self.apply_indentation(width)?;

        loop {
            self.skip_inline_whitespace()?;
            if self.at_line_end() || self.at_comment() {
                break;
            }
            let token = self.next_token()?;
            self.tokens.push(token);
        }

        while !self.at_line_end() {
            self.advance();
        }

        self.mark_start();
        let lexeme = if self.peek() == Some('\n') {
            self.advance();
            "\n"
        } else {
            ""
        };
        let newline = self.make_token(TokenKind::Newline, lexeme);
        self.tokens.push(newline);
        if lexeme == "\n" {
            self.next_line();
        }
        Ok(())
    }

    /// Compare a line's indentation with the open levels
    fn apply_indentation(&mut self, width: usize) -> Result<(), LexError> {
        let top = self.current_indent();
        if width > top {
            self.indent_stack.push(width);
            tracing::trace!(line = self.line, width, "indent");
            let indent = self.make_token(TokenKind::Indent, "");
            self.tokens.push(indent);
        } else if width < top {
            while width < self.current_indent() {
                self.indent_stack.pop();
                tracing::trace!(line = self.line, width, "dedent");
                let dedent = self.make_token(TokenKind::Dedent, "");
                self.tokens.push(dedent);
            }
            if width != self.current_indent() {
                return Err(LexError::InconsistentDedent {
                    width,
                    span: Span::new(self.current, self.current + 1, self.line, self.column),
                });
            }
        }
        Ok(())
    }

    fn current_indent(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    /// Scan the next token on the current line
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.mark_start();
        let c = self.advance();

        let token = match c {
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            ',' => self.make_token(TokenKind::Comma, ","),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),
            '!' => self.make_token(TokenKind::Bang, "!"),
            '~' => self.make_token(TokenKind::Tilde, "~"),
            '<' => self.make_token(TokenKind::Less, "<"),
            '>' => self.make_token(TokenKind::Greater, ">"),
            '-' => {
                if self.match_char('>') {
                    self.make_token(TokenKind::Arrow, "->")
                } else {
                    self.make_token(TokenKind::Minus, "-")
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual, "==")
                } else {
                    self.make_token(TokenKind::Equal, "=")
                }
            }

            '"' => return self.string(),
            '\'' => return self.char_literal(),

            c if c.is_ascii_digit() => return self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                return Err(LexError::UnexpectedCharacter {
                    ch: c,
                    span: self.span_from_start(),
                })
            }
        };

        Ok(token)
    }

    // === Whitespace and comments ===

    /// True if nothing but spaces, carriage returns, or a comment remain on this line
    fn rest_of_line_is_blank(&self) -> bool {
        let mut pos = self.current;
        while let Some(&c) = self.chars.get(pos) {
            match c {
                ' ' | '\r' => pos += 1,
                '\n' => return true,
                '/' => return self.chars.get(pos + 1) == Some(&'/'),
                _ => return false,
            }
        }
        true
    }

    /// Consume the rest of the line and its newline
    fn skip_line(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        if self.peek() == Some('\n') {
            self.advance();
            self.next_line();
        }
    }

    fn skip_inline_whitespace(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\r') => {
                    self.advance();
                }
                Some('\t') => return Err(self.tab_error()),
                _ => return Ok(()),
            }
        }
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && self.peek_next() == Some('/')
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n'))
    }

    fn tab_error(&self) -> LexError {
        LexError::TabCharacter {
            span: Span::new(self.current, self.current + 1, self.line, self.column),
        }
    }

    // === Character navigation ===

    /// Advance to next character and return it
    pub(super) fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    /// Peek at current character without advancing
    pub(super) fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    /// Peek at next character (current + 1)
    pub(super) fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    /// Check if current character matches expected, and advance if so
    pub(super) fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Check if we've reached the end of source
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn next_line(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    // === Token creation ===

    fn mark_start(&mut self) {
        self.start_pos = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    pub(super) fn span_from_start(&self) -> Span {
        Span::new(self.start_pos, self.current, self.start_line, self.start_column)
    }

    /// Create a token with the given kind and lexeme
    pub(super) fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, self.span_from_start())
    }
}
