//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Till lexer, including the
//! layout tokens synthesized from indentation.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token type produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token (decoded text for string/char literals)
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello")
    String,
    /// Character literal ('a')
    Char,
    /// `true` keyword
    True,
    /// `false` keyword
    False,
    /// Identifier (also used for type names such as `Num`)
    Identifier,

    // Keywords
    /// `if` keyword
    If,
    /// `while` keyword
    While,
    /// `return` keyword
    Return,
    /// `display` keyword
    Display,

    // Operators
    /// `+` (addition)
    Plus,
    /// `-` (subtraction)
    Minus,
    /// `*` (multiplication)
    Star,
    /// `/` (division)
    Slash,
    /// `!` (logical not)
    Bang,
    /// `~` (numeric negation)
    Tilde,
    /// `==` (equality)
    EqualEqual,
    /// `<` (less than)
    Less,
    /// `>` (greater than)
    Greater,

    // Punctuation
    /// `=` (assignment)
    Equal,
    /// `(` (left parenthesis)
    LeftParen,
    /// `)` (right parenthesis)
    RightParen,
    /// `,` (comma)
    Comma,
    /// `->` (arrow for function return type)
    Arrow,

    // Layout
    /// End of a non-blank logical line
    Newline,
    /// Indentation increased
    Indent,
    /// Indentation decreased by one level
    Dedent,

    // Special
    /// End of file
    Eof,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "if" => Some(TokenKind::If),
            "while" => Some(TokenKind::While),
            "return" => Some(TokenKind::Return),
            "display" => Some(TokenKind::Display),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Get the string representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Char => "character",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Identifier => "identifier",
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Display => "display",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::EqualEqual => "==",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Equal => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Arrow => "->",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of input",
        }
    }

    /// Whether this kind is synthesized from layout rather than source text
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new(TokenKind::Number, "42", Span::new(0, 2, 1, 1));
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.lexeme, "42");
        assert_eq!(token.span, Span::new(0, 2, 1, 1));
    }

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::is_keyword("if"), Some(TokenKind::If));
        assert_eq!(TokenKind::is_keyword("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::is_keyword("return"), Some(TokenKind::Return));
        assert_eq!(TokenKind::is_keyword("display"), Some(TokenKind::Display));
        assert_eq!(TokenKind::is_keyword("true"), Some(TokenKind::True));
        assert_eq!(TokenKind::is_keyword("false"), Some(TokenKind::False));
    }

    #[test]
    fn test_non_keyword() {
        assert_eq!(TokenKind::is_keyword("Num"), None);
        assert_eq!(TokenKind::is_keyword("else"), None);
        assert_eq!(TokenKind::is_keyword("If"), None); // Case-sensitive
    }

    #[test]
    fn test_token_kind_as_str() {
        assert_eq!(TokenKind::Tilde.as_str(), "~");
        assert_eq!(TokenKind::EqualEqual.as_str(), "==");
        assert_eq!(TokenKind::Arrow.as_str(), "->");
        assert_eq!(TokenKind::Dedent.as_str(), "dedent");
    }

    #[test]
    fn test_layout_kinds() {
        assert!(TokenKind::Indent.is_layout());
        assert!(TokenKind::Newline.is_layout());
        assert!(!TokenKind::Identifier.is_layout());
    }
}
