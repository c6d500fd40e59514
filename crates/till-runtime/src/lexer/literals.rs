//! Literal parsing for the lexer

use crate::lexer::{LexError, Lexer};
use crate::span::Span;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// Scan a string literal; the opening quote is already consumed
    pub(super) fn string(&mut self) -> Result<Token, LexError> {
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString {
                        span: self.span_from_start(),
                    })
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), None | Some('\n')) {
                        return Err(LexError::UnterminatedString {
                            span: self.span_from_start(),
                        });
                    }
                    value.push(self.escape()?);
                }
                Some(_) => value.push(self.advance()),
            }
        }

        Ok(self.make_token(TokenKind::String, &value))
    }

    /// Scan a character literal; the opening quote is already consumed
    pub(super) fn char_literal(&mut self) -> Result<Token, LexError> {
        let value = match self.peek() {
            None | Some('\n') => {
                return Err(LexError::UnterminatedChar {
                    span: self.span_from_start(),
                })
            }
            Some('\'') => {
                self.advance();
                return Err(LexError::InvalidCharLiteral {
                    span: self.span_from_start(),
                });
            }
            Some('\\') => {
                self.advance();
                if matches!(self.peek(), None | Some('\n')) {
                    return Err(LexError::UnterminatedChar {
                        span: self.span_from_start(),
                    });
                }
                self.escape()?
            }
            Some(_) => self.advance(),
        };

        if self.match_char('\'') {
            return Ok(self.make_token(TokenKind::Char, &value.to_string()));
        }

        // More than one character before a closing quote on the same line
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
            if c == '\'' {
                return Err(LexError::InvalidCharLiteral {
                    span: self.span_from_start(),
                });
            }
        }

        Err(LexError::UnterminatedChar {
            span: self.span_from_start(),
        })
    }

    /// Decode the character after a backslash
    fn escape(&mut self) -> Result<char, LexError> {
        let c = self.advance();
        let escaped = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            _ => {
                return Err(LexError::InvalidEscape {
                    ch: c,
                    span: Span::new(
                        self.current - 2,
                        self.current,
                        self.line,
                        self.column.saturating_sub(2),
                    ),
                })
            }
        };
        Ok(escaped)
    }

    /// Scan a number literal; a `.` is part of it only when a digit follows
    pub(super) fn number(&mut self) -> Result<Token, LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume .
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        if !text.parse::<f64>().is_ok_and(f64::is_finite) {
            return Err(LexError::NumberOutOfRange {
                span: self.span_from_start(),
            });
        }
        Ok(self.make_token(TokenKind::Number, &text))
    }

    /// Scan an identifier or keyword
    pub(super) fn identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::is_keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, &text)
    }
}
