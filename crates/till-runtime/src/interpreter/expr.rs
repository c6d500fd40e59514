//! Expression evaluation

use crate::ast::*;
use crate::interpreter::stmt::resolve_type;
use crate::interpreter::{ControlFlow, Interpreter, ScopeId};
use crate::span::Span;
use crate::value::{Function, RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn eval_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(match lit {
                Literal::Number(n) => Value::Num(*n),
                Literal::String(s) => Value::string(s.as_str()),
                Literal::Char(c) => Value::Char(*c),
                Literal::Bool(b) => Value::Bool(*b),
            }),
            Expr::Identifier(id) => self
                .env
                .lookup(scope, &id.name)
                .map(|binding| binding.value.clone())
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: id.name.clone(),
                    span: id.span,
                }),
            Expr::Unary(unary) => self.eval_unary(unary, scope),
            Expr::Binary(binary) => self.eval_binary(binary, scope),
            Expr::Call(call) => self.call_function(call, scope),
            Expr::Group(group) => self.eval_expr(&group.expr, scope),
        }
    }

    /// Evaluate an `if`/`while` condition
    pub(super) fn eval_condition(&mut self, cond: &Expr, scope: ScopeId) -> Result<bool, RuntimeError> {
        match self.eval_expr(cond, scope)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeMismatch {
                msg: format!("condition must be Bool, found {}", other.type_name()),
                span: cond.span(),
            }),
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
        let operand = self.eval_expr(&unary.expr, scope)?;
        match (unary.op, &operand) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Negate, Value::Num(n)) => Ok(Value::Num(-n)),
            (op, _) => Err(RuntimeError::TypeMismatch {
                msg: format!(
                    "operator '{}' cannot be applied to {}",
                    op.as_str(),
                    operand.type_name()
                ),
                span: unary.span,
            }),
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(&binary.left, scope)?;
        let right = self.eval_expr(&binary.right, scope)?;
        let span = binary.span;

        if binary.op == BinaryOp::Eq {
            return Ok(Value::Bool(left == right));
        }

        let (a, b) = match (&left, &right) {
            (Value::Num(a), Value::Num(b)) => (*a, *b),
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    msg: format!(
                        "operator '{}' cannot be applied to {} and {}",
                        binary.op.as_str(),
                        left.type_name(),
                        right.type_name()
                    ),
                    span,
                })
            }
        };

        match binary.op {
            BinaryOp::Lt => Ok(Value::Bool(a < b)),
            BinaryOp::Gt => Ok(Value::Bool(a > b)),
            BinaryOp::Add => finite(a + b, span),
            BinaryOp::Sub => finite(a - b, span),
            BinaryOp::Mul => finite(a * b, span),
            BinaryOp::Div => {
                if b == 0.0 {
                    return Err(RuntimeError::DivideByZero { span });
                }
                finite(a / b, span)
            }
            BinaryOp::Eq => Ok(Value::Bool(a == b)),
        }
    }

    /// Call a user function
    ///
    /// Arguments are evaluated left to right in the caller's scope; the body
    /// runs in a new scope whose parent is the function's defining scope.
    fn call_function(&mut self, call: &CallExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
        let name = &call.callee.name;
        let func = match self.env.lookup(scope, name).map(|binding| &binding.value) {
            Some(Value::Function(func)) => Rc::clone(func),
            Some(other) => {
                return Err(RuntimeError::TypeMismatch {
                    msg: format!("'{}' is a {}, not a function", name, other.type_name()),
                    span: call.callee.span,
                })
            }
            None => {
                return Err(RuntimeError::UndefinedVariable {
                    name: name.clone(),
                    span: call.callee.span,
                })
            }
        };

        if call.args.len() != func.arity() {
            return Err(RuntimeError::TypeMismatch {
                msg: format!(
                    "'{}' expects {} argument(s) but got {}",
                    name,
                    func.arity(),
                    call.args.len()
                ),
                span: call.span,
            });
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg, scope)?);
        }

        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.max_call_depth,
                span: call.span,
            });
        }

        self.call_depth += 1;
        tracing::trace!(function = func.name(), depth = self.call_depth, "call");
        let frame = self.env.push(func.closure);
        let result = self.run_function_body(&func, args, frame);
        self.env.release(frame);
        self.call_depth -= 1;
        result
    }

    /// Seed parameters and run the body in `frame`
    fn run_function_body(
        &mut self,
        func: &Function,
        args: Vec<Value>,
        frame: ScopeId,
    ) -> Result<Value, RuntimeError> {
        for (param, arg) in func.decl.params.iter().zip(args) {
            let ty = resolve_type(&param.type_ref)?;
            self.declare(frame, &param.name, Some(ty), arg)?;
        }

        match self.exec_statements(&func.decl.body.statements, frame)? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal => Ok(Value::Void),
        }
    }
}

/// Reject NaN and infinities produced by arithmetic
fn finite(n: f64, span: Span) -> Result<Value, RuntimeError> {
    if n.is_finite() {
        Ok(Value::Num(n))
    } else {
        Err(RuntimeError::InvalidNumericResult { span })
    }
}
