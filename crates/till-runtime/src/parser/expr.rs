//! Expression parsing
//!
//! One function per precedence level, loosest first:
//! equality `==`, comparison `< >`, term `+ -`, factor `* /`, unary `! ~`,
//! then primaries. Each binary level loops, so operators of equal
//! precedence associate to the left.

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

type Level = fn(&mut Parser) -> Result<Expr, ParseError>;

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[(TokenKind::EqualEqual, BinaryOp::Eq)], Parser::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Less, BinaryOp::Lt),
                (TokenKind::Greater, BinaryOp::Gt),
            ],
            Parser::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Sub),
            ],
            Parser::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
            ],
            Parser::parse_unary,
        )
    }

    /// Parse `operand (op operand)*`, folding to the left
    fn parse_binary_level(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
        operand: Level,
    ) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = operand(self)?;

        // Each fold deepens the left spine by one
        while let Some(&(_, op)) = ops.iter().find(|(kind, _)| self.check(*kind)) {
            self.advance();
            self.enter()?;
            let right = operand(self)?;
            let span = left.span().merge(right.span());
            left = Expr::Binary(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            });
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse prefix `!` / `~`; nests, so `~~x` is `~(~x)`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::Negate,
            _ => return self.parse_primary(),
        };
        self.enter()?;
        let op_span = self.advance().span;
        let expr = self.parse_unary()?;
        self.leave();
        let span = op_span.merge(expr.span());
        Ok(Expr::Unary(UnaryExpr {
            op,
            expr: Box::new(expr),
            span,
        }))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Number => {
                let value: f64 = self
                    .peek()
                    .lexeme
                    .parse()
                    .map_err(|_| self.error("expression"))?;
                let span = self.advance().span;
                Ok(Expr::Literal(Literal::Number(value), span))
            }
            TokenKind::String => {
                let token = self.advance();
                Ok(Expr::Literal(Literal::String(token.lexeme.clone()), token.span))
            }
            TokenKind::Char => {
                let value = self.peek().lexeme.chars().next();
                match value {
                    Some(c) => {
                        let span = self.advance().span;
                        Ok(Expr::Literal(Literal::Char(c), span))
                    }
                    None => Err(self.error("expression")),
                }
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                let value = token.kind == TokenKind::True;
                Ok(Expr::Literal(Literal::Bool(value), token.span))
            }
            TokenKind::Identifier => {
                let ident = self.consume_identifier("expression")?;
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(ident)
                } else {
                    Ok(Expr::Identifier(ident))
                }
            }
            TokenKind::LeftParen => self.parse_group(),
            _ => Err(self.error("expression")),
        }
    }

    /// Parse call arguments after the callee name
    fn parse_call(&mut self, callee: Identifier) -> Result<Expr, ParseError> {
        self.enter()?;
        self.consume(TokenKind::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightParen, "',' or ')'")?.span;
        self.leave();
        let span = callee.span.merge(end);
        Ok(Expr::Call(CallExpr { callee, args, span }))
    }

    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let start = self.consume(TokenKind::LeftParen, "'('")?.span;
        let expr = self.parse_expression()?;
        let end = self.consume(TokenKind::RightParen, "')'")?.span;
        self.leave();
        Ok(Expr::Group(GroupExpr {
            expr: Box::new(expr),
            span: start.merge(end),
        }))
    }
}
