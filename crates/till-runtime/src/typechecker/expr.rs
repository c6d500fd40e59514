//! Expression type checking

use crate::ast::*;
use crate::typechecker::{expect_type, Symbol, TypeChecker, TypeError};
use crate::types::Type;

impl TypeChecker {
    /// Check an expression and return its type
    pub(super) fn check_expr(&mut self, expr: &Expr) -> Result<Type, TypeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(match lit {
                Literal::Number(_) => Type::Num,
                Literal::String(_) => Type::Str,
                Literal::Char(_) => Type::Char,
                Literal::Bool(_) => Type::Bool,
            }),
            Expr::Identifier(id) => match self.lookup(&id.name) {
                Some(Symbol::Variable(ty)) => Ok(*ty),
                Some(Symbol::Function(_)) => Err(TypeError::FunctionAsValue {
                    name: id.name.clone(),
                    span: id.span,
                }),
                None => Err(TypeError::UndefinedVariable {
                    name: id.name.clone(),
                    span: id.span,
                }),
            },
            Expr::Unary(unary) => self.check_unary(unary),
            Expr::Binary(binary) => self.check_binary(binary),
            Expr::Call(call) => self.check_call(call),
            Expr::Group(group) => self.check_expr(&group.expr),
        }
    }

    fn check_unary(&mut self, unary: &UnaryExpr) -> Result<Type, TypeError> {
        let operand = self.check_expr(&unary.expr)?;
        let expected = match unary.op {
            UnaryOp::Not => Type::Bool,
            UnaryOp::Negate => Type::Num,
        };

        if operand == expected {
            Ok(expected)
        } else {
            Err(TypeError::InvalidOperand {
                op: unary.op.as_str().to_string(),
                operand,
                span: unary.span,
            })
        }
    }

    fn check_binary(&mut self, binary: &BinaryExpr) -> Result<Type, TypeError> {
        let left = self.check_expr(&binary.left)?;
        let right = self.check_expr(&binary.right)?;

        let result = match binary.op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                (left == Type::Num && right == Type::Num).then_some(Type::Num)
            }
            BinaryOp::Lt | BinaryOp::Gt => {
                (left == Type::Num && right == Type::Num).then_some(Type::Bool)
            }
            BinaryOp::Eq => (left == right).then_some(Type::Bool),
        };

        result.ok_or_else(|| TypeError::InvalidOperands {
            op: binary.op.as_str().to_string(),
            left,
            right,
            span: binary.span,
        })
    }

    /// Check a call against the callee's signature
    fn check_call(&mut self, call: &CallExpr) -> Result<Type, TypeError> {
        let name = &call.callee.name;
        let sig = match self.lookup(name) {
            Some(Symbol::Function(sig)) => sig.clone(),
            Some(Symbol::Variable(_)) => {
                return Err(TypeError::NotCallable {
                    name: name.clone(),
                    span: call.callee.span,
                })
            }
            None => {
                return Err(TypeError::UndefinedFunction {
                    name: name.clone(),
                    span: call.callee.span,
                })
            }
        };

        if sig.params.len() != call.args.len() {
            return Err(TypeError::ArityMismatch {
                name: name.clone(),
                expected: sig.params.len(),
                found: call.args.len(),
                span: call.span,
            });
        }

        for (index, (arg, expected)) in call.args.iter().zip(&sig.params).enumerate() {
            let found = self.check_expr(arg)?;
            expect_type(
                *expected,
                found,
                || format!("argument {} of '{}'", index + 1, name),
                arg.span(),
            )?;
        }

        sig.return_type.ok_or_else(|| TypeError::VoidFunctionInExpr {
            name: name.clone(),
            span: call.span,
        })
    }
}
