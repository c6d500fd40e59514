//! Statement parsing

use crate::ast::*;
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::If => Ok(Stmt::If(self.parse_if()?)),
            TokenKind::While => Ok(Stmt::While(self.parse_while()?)),
            TokenKind::Return => Ok(Stmt::Return(self.parse_return()?)),
            TokenKind::Display => Ok(Stmt::Display(self.parse_display()?)),
            TokenKind::Identifier => match self.peek_next_kind() {
                TokenKind::LeftParen => Ok(Stmt::FunctionDecl(self.parse_function()?)),
                TokenKind::Identifier => Ok(Stmt::VarDecl(self.parse_var_decl()?)),
                TokenKind::Equal => Ok(Stmt::Assign(self.parse_assign()?)),
                _ => {
                    self.advance();
                    Err(self.error("a variable name, '=' or '('"))
                }
            },
            _ => Err(self.error("a statement")),
        }
    }

    /// A simple statement ends at its line end; the last one of a chunk may
    /// also end where the block or input does
    fn end_simple_statement(&mut self) -> Result<(), ParseError> {
        if self.match_token(TokenKind::Newline)
            || self.check(TokenKind::Dedent)
            || self.is_at_end()
        {
            Ok(())
        } else {
            Err(self.error("end of line"))
        }
    }

    /// Parse if statement: `if cond` followed by a block
    fn parse_if(&mut self) -> Result<IfStmt, ParseError> {
        let keyword_span = self.consume(TokenKind::If, "'if'")?.span;
        let cond = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = keyword_span.merge(body.span);
        Ok(IfStmt { cond, body, span })
    }

    /// Parse while loop: `while cond` followed by a block
    fn parse_while(&mut self) -> Result<WhileStmt, ParseError> {
        let keyword_span = self.consume(TokenKind::While, "'while'")?.span;
        let cond = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = keyword_span.merge(body.span);
        Ok(WhileStmt { cond, body, span })
    }

    /// Parse return statement; the value is optional
    fn parse_return(&mut self) -> Result<ReturnStmt, ParseError> {
        let keyword_span = self.consume(TokenKind::Return, "'return'")?.span;

        let value = if self.check(TokenKind::Newline)
            || self.check(TokenKind::Dedent)
            || self.is_at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let span = match &value {
            Some(expr) => keyword_span.merge(expr.span()),
            None => keyword_span,
        };
        self.end_simple_statement()?;
        Ok(ReturnStmt { value, span })
    }

    fn parse_display(&mut self) -> Result<DisplayStmt, ParseError> {
        let keyword_span = self.consume(TokenKind::Display, "'display'")?.span;
        let value = self.parse_expression()?;
        let span = keyword_span.merge(value.span());
        self.end_simple_statement()?;
        Ok(DisplayStmt { value, span })
    }

    /// Parse variable declaration: `Type name [= expr]`
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let type_ref = self.parse_type_ref("a type name")?;
        let name = self.consume_identifier("a variable name")?;

        let init = if self.match_token(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end = init.as_ref().map(|e| e.span()).unwrap_or(name.span);
        let span = type_ref.span.merge(end);
        self.end_simple_statement()?;
        Ok(VarDecl {
            type_ref,
            name,
            init,
            span,
        })
    }

    /// Parse assignment: `name = expr`
    fn parse_assign(&mut self) -> Result<Assign, ParseError> {
        let target = self.consume_identifier("a variable name")?;
        self.consume(TokenKind::Equal, "'='")?;
        let value = self.parse_expression()?;
        let span = target.span.merge(value.span());
        self.end_simple_statement()?;
        Ok(Assign {
            target,
            value,
            span,
        })
    }

    /// Parse function declaration: `name(Type a, Type b) [-> Type]` and a block
    fn parse_function(&mut self) -> Result<FunctionDecl, ParseError> {
        let name = self.consume_identifier("a function name")?;
        self.consume(TokenKind::LeftParen, "'('")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let type_ref = self.parse_type_ref("a parameter type")?;
                let param_name = self.consume_identifier("a parameter name")?;
                let span = type_ref.span.merge(param_name.span);
                params.push(Param {
                    type_ref,
                    name: param_name,
                    span,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "',' or ')'")?;

        let return_type = if self.match_token(TokenKind::Arrow) {
            Some(self.parse_type_ref("a return type")?)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = name.span.merge(body.span);
        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span,
        })
    }

    fn parse_type_ref(&mut self, context: &str) -> Result<TypeRef, ParseError> {
        let ident = self.consume_identifier(context)?;
        Ok(TypeRef {
            name: ident.name,
            span: ident.span,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse_source;

    fn single(source: &str) -> Stmt {
        let mut program = parse_source(source).unwrap();
        assert_eq!(program.statements.len(), 1, "expected one statement");
        program.statements.remove(0)
    }

    #[test]
    fn test_var_decl_without_initializer() {
        match single("Bool done\n") {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.type_ref.name, "Bool");
                assert_eq!(decl.name.name, "done");
                assert!(decl.init.is_none());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_function_decl() {
        match single("add(Num a, Num b) -> Num\n    return a + b\n") {
            Stmt::FunctionDecl(func) => {
                assert_eq!(func.name.name, "add");
                let names: Vec<_> = func.params.iter().map(|p| p.name.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(func.return_type.map(|t| t.name), Some("Num".to_string()));
                assert_eq!(func.body.statements.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_function_without_params_or_return_type() {
        match single("hello()\n    display \"hi\"\n    return\n") {
            Stmt::FunctionDecl(func) => {
                assert!(func.params.is_empty());
                assert!(func.return_type.is_none());
                assert!(matches!(
                    func.body.statements[1],
                    Stmt::Return(ReturnStmt { value: None, .. })
                ));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_call_statement_is_rejected() {
        let err = parse_source("square(4)\n").unwrap_err();
        assert_eq!(err.expected, "a parameter type");
    }

    #[test]
    fn test_nested_blocks_close_together() {
        let program =
            parse_source("if true\n    while false\n        display 1\ndisplay 2\n").unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_expression_statement_is_rejected() {
        let err = parse_source("x + 1\n").unwrap_err();
        assert_eq!(err.expected, "a variable name, '=' or '('");
    }

    #[test]
    fn test_trailing_tokens_after_statement() {
        let err = parse_source("display 1 2\n").unwrap_err();
        assert_eq!(err.expected, "end of line");
        assert_eq!(err.found, "number 2");
    }
}
