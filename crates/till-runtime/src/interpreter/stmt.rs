//! Statement execution

use crate::ast::*;
use crate::interpreter::{Binding, ControlFlow, Interpreter, ScopeId};
use crate::output::DisplayOutput;
use crate::types::Type;
use crate::value::{Function, RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Execute statements in order, stopping at the first `return`
    pub(super) fn exec_statements(
        &mut self,
        statements: &[Stmt],
        scope: ScopeId,
    ) -> Result<ControlFlow, RuntimeError> {
        for stmt in statements {
            let flow = self.exec_statement(stmt, scope)?;
            if let ControlFlow::Return(_) = flow {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Execute a block in a child scope that is released on every exit path
    pub(super) fn exec_block(
        &mut self,
        block: &Block,
        parent: ScopeId,
    ) -> Result<ControlFlow, RuntimeError> {
        let scope = self.env.push(parent);
        let result = self.exec_statements(&block.statements, scope);
        self.env.release(scope);
        result
    }

    fn exec_statement(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::VarDecl(decl) => self.exec_var_decl(decl, scope),
            Stmt::Assign(assign) => self.exec_assign(assign, scope),
            Stmt::If(if_stmt) => {
                if self.eval_condition(&if_stmt.cond, scope)? {
                    self.exec_block(&if_stmt.body, scope)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }
            Stmt::While(while_stmt) => {
                while self.eval_condition(&while_stmt.cond, scope)? {
                    let flow = self.exec_block(&while_stmt.body, scope)?;
                    if let ControlFlow::Return(_) = flow {
                        return Ok(flow);
                    }
                }
                Ok(ControlFlow::Normal)
            }
            Stmt::FunctionDecl(func) => {
                let value = Value::Function(Rc::new(Function {
                    decl: Rc::new(func.clone()),
                    closure: scope,
                }));
                self.declare(scope, &func.name, None, value)?;
                Ok(ControlFlow::Normal)
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Void,
                };
                Ok(ControlFlow::Return(value))
            }
            Stmt::Display(display) => {
                let value = self.eval_expr(&display.value, scope)?;
                let output = DisplayOutput {
                    text: value.to_string(),
                    line: display.span.line,
                };
                self.emit(output, display.span)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    fn exec_var_decl(&mut self, decl: &VarDecl, scope: ScopeId) -> Result<ControlFlow, RuntimeError> {
        let ty = resolve_type(&decl.type_ref)?;
        let value = match &decl.init {
            Some(init) => self.eval_expr(init, scope)?,
            None => Value::zero(ty),
        };
        self.declare(scope, &decl.name, Some(ty), value)?;
        Ok(ControlFlow::Normal)
    }

    fn exec_assign(&mut self, assign: &Assign, scope: ScopeId) -> Result<ControlFlow, RuntimeError> {
        let value = self.eval_expr(&assign.value, scope)?;
        let target = &assign.target;

        let binding = self
            .env
            .lookup_mut(scope, &target.name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: target.name.clone(),
                span: target.span,
            })?;

        if binding.ty.is_none() || binding.ty != value.type_of() {
            return Err(RuntimeError::TypeMismatch {
                msg: format!("cannot assign {} to '{}'", value.type_name(), target.name),
                span: assign.span,
            });
        }
        binding.value = value;
        Ok(ControlFlow::Normal)
    }

    /// Bind a new name in `scope`
    pub(super) fn declare(
        &mut self,
        scope: ScopeId,
        name: &Identifier,
        ty: Option<Type>,
        value: Value,
    ) -> Result<(), RuntimeError> {
        if self.env.declare(scope, &name.name, Binding { ty, value }) {
            Ok(())
        } else {
            Err(RuntimeError::TypeMismatch {
                msg: format!("'{}' is already declared in this scope", name.name),
                span: name.span,
            })
        }
    }
}

/// Resolve a declared type name at run time
pub(super) fn resolve_type(type_ref: &TypeRef) -> Result<Type, RuntimeError> {
    Type::from_name(&type_ref.name).ok_or_else(|| RuntimeError::TypeMismatch {
        msg: format!("unknown type '{}'", type_ref.name),
        span: type_ref.span,
    })
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::parser::parse_source;
    use crate::value::RuntimeError;

    fn outputs(source: &str) -> Result<Vec<String>, RuntimeError> {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::default();
        interpreter.run(&program)?;
        Ok(interpreter.take_outputs().into_iter().map(|o| o.text).collect())
    }

    #[test]
    fn test_zero_initialized_declarations() {
        assert_eq!(
            outputs("Num n\nStr s\nBool b\ndisplay n\ndisplay s\ndisplay b\n").unwrap(),
            vec!["0", "", "false"]
        );
    }

    #[test]
    fn test_while_counts_down() {
        assert_eq!(
            outputs("Num i = 3\nwhile i > 0\n    display i\n    i = i - 1\n").unwrap(),
            vec!["3", "2", "1"]
        );
    }

    #[test]
    fn test_while_body_gets_fresh_scope_each_iteration() {
        let source = "Num i = 0\nwhile i < 2\n    Num seen = i\n    display seen\n    i = i + 1\n";
        assert_eq!(outputs(source).unwrap(), vec!["0", "1"]);
    }

    #[test]
    fn test_assignment_in_block_updates_outer_variable() {
        assert_eq!(
            outputs("Num x = 1\nif true\n    x = 2\ndisplay x\n").unwrap(),
            vec!["2"]
        );
    }

    #[test]
    fn test_shadowing_in_block() {
        assert_eq!(
            outputs("Num x = 1\nif true\n    Num x = 2\n    display x\ndisplay x\n").unwrap(),
            vec!["2", "1"]
        );
    }

    #[test]
    fn test_return_leaves_loop_and_function() {
        let source = "first(Num limit) -> Num\n    Num i = 0\n    while true\n        if i > limit\n            return i\n        i = i + 1\n    return 0\ndisplay first(4)\n";
        assert_eq!(outputs(source).unwrap(), vec!["5"]);
    }

    #[test]
    fn test_unchecked_assignment_type_is_caught() {
        let err = outputs("Num x = 1\nx = \"one\"\n").unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unchecked_undefined_variable() {
        let err = outputs("y = 1\n").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "y"));
    }
}
