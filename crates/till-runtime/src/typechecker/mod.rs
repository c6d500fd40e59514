//! Static type checking
//!
//! The type checker enforces Till's type rules before anything runs:
//! - Every variable has a declared type; initializers and assignments match it
//! - Conditions are `Bool`; there is no truthiness
//! - Arithmetic and ordering need `Num`; `==` needs operands of one type
//! - Calls match the callee's arity and parameter types
//! - Names are visible only after their declaration, in the declaring block

mod expr;

use crate::ast::*;
use crate::diagnostic::{Diagnostic, Phase};
use crate::span::Span;
use crate::types::{FunctionSig, Type};
use std::collections::HashMap;
use thiserror::Error;

/// Type errors. Checking stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unknown variable '{name}' at {span}")]
    UndefinedVariable { name: String, span: Span },

    #[error("call to undeclared function '{name}' at {span}")]
    UndefinedFunction { name: String, span: Span },

    #[error("'{name}' is already declared in this scope at {span}")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("type mismatch in {context} at {span}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("operator '{op}' cannot be applied to {left} and {right} at {span}")]
    InvalidOperands {
        op: String,
        left: Type,
        right: Type,
        span: Span,
    },

    #[error("operator '{op}' cannot be applied to {operand} at {span}")]
    InvalidOperand {
        op: String,
        operand: Type,
        span: Span,
    },

    #[error("'{name}' expects {expected} argument(s) but got {found} at {span}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("unknown type '{name}' at {span}")]
    NonexistentType { name: String, span: Span },

    #[error("function '{name}' has no return type and cannot be used in an expression at {span}")]
    VoidFunctionInExpr { name: String, span: Span },

    #[error("'return' outside of a function at {span}")]
    ReturnOutsideFunction { span: Span },

    #[error("function '{name}' must return a {expected} value at {span}")]
    MissingReturnValue {
        name: String,
        expected: Type,
        span: Span,
    },

    #[error("function '{name}' has no return type but returns a value at {span}")]
    UnexpectedReturnValue { name: String, span: Span },

    #[error("function '{name}' declares return type {expected} but has no top-level 'return' at {span}")]
    MissingReturn {
        name: String,
        expected: Type,
        span: Span,
    },

    #[error("'{name}' is a variable, not a function, at {span}")]
    NotCallable { name: String, span: Span },

    #[error("function '{name}' cannot be used as a value at {span}")]
    FunctionAsValue { name: String, span: Span },

    #[error("cannot assign to function '{name}' at {span}")]
    AssignToFunction { name: String, span: Span },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::UndefinedVariable { span, .. }
            | TypeError::UndefinedFunction { span, .. }
            | TypeError::DuplicateDeclaration { span, .. }
            | TypeError::TypeMismatch { span, .. }
            | TypeError::InvalidOperands { span, .. }
            | TypeError::InvalidOperand { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::NonexistentType { span, .. }
            | TypeError::VoidFunctionInExpr { span, .. }
            | TypeError::ReturnOutsideFunction { span }
            | TypeError::MissingReturnValue { span, .. }
            | TypeError::UnexpectedReturnValue { span, .. }
            | TypeError::MissingReturn { span, .. }
            | TypeError::NotCallable { span, .. }
            | TypeError::FunctionAsValue { span, .. }
            | TypeError::AssignToFunction { span, .. } => *span,
        }
    }

    /// Diagnostic code (TL3xxx)
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::UndefinedVariable { .. } => "TL3001",
            TypeError::UndefinedFunction { .. } => "TL3002",
            TypeError::DuplicateDeclaration { .. } => "TL3003",
            TypeError::TypeMismatch { .. } => "TL3004",
            TypeError::InvalidOperands { .. } => "TL3005",
            TypeError::InvalidOperand { .. } => "TL3006",
            TypeError::ArityMismatch { .. } => "TL3007",
            TypeError::NonexistentType { .. } => "TL3008",
            TypeError::VoidFunctionInExpr { .. } => "TL3009",
            TypeError::ReturnOutsideFunction { .. } => "TL3010",
            TypeError::MissingReturnValue { .. } => "TL3011",
            TypeError::UnexpectedReturnValue { .. } => "TL3012",
            TypeError::MissingReturn { .. } => "TL3013",
            TypeError::NotCallable { .. } => "TL3014",
            TypeError::FunctionAsValue { .. } => "TL3015",
            TypeError::AssignToFunction { .. } => "TL3016",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error_with_code(Phase::Type, self.code(), self.to_string(), self.span())
            .with_label("type error");
        match self {
            TypeError::UndefinedVariable { .. } => {
                diag.with_help("declare the variable before this line, in this block or an enclosing one")
            }
            TypeError::NonexistentType { .. } => diag.with_help("types are Num, Str, Char and Bool"),
            TypeError::InvalidOperands { op, .. } if op == "==" => {
                diag.with_help("both sides of '==' must have the same type")
            }
            TypeError::MissingReturn { .. } => {
                diag.with_help("add a 'return' at the end of the function body")
            }
            _ => diag,
        }
    }
}

/// What a name refers to during checking
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Type),
    Function(FunctionSig),
}

/// Enclosing function, for `return` checking
#[derive(Debug, Clone)]
struct FunctionContext {
    name: String,
    return_type: Option<Type>,
}

/// Type checker state
pub struct TypeChecker {
    /// Lexical scopes, innermost last
    pub(super) scopes: Vec<HashMap<String, Symbol>>,
    current_function: Option<FunctionContext>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    /// Create a new type checker
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            current_function: None,
        }
    }

    /// Type check a program
    pub fn check(&mut self, program: &Program) -> Result<(), TypeError> {
        self.scopes = vec![HashMap::new()];
        self.current_function = None;

        for stmt in &program.statements {
            self.check_statement(stmt)?;
        }

        tracing::debug!(statements = program.statements.len(), "type checked program");
        Ok(())
    }

    /// Check statements of a block in a fresh scope
    fn check_block(&mut self, block: &Block) -> Result<(), TypeError> {
        self.scopes.push(HashMap::new());
        let result = block
            .statements
            .iter()
            .try_for_each(|stmt| self.check_statement(stmt));
        self.scopes.pop();
        result
    }

    fn check_statement(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::Assign(assign) => self.check_assign(assign),
            Stmt::If(if_stmt) => {
                self.check_condition(&if_stmt.cond)?;
                self.check_block(&if_stmt.body)
            }
            Stmt::While(while_stmt) => {
                self.check_condition(&while_stmt.cond)?;
                self.check_block(&while_stmt.body)
            }
            Stmt::FunctionDecl(func) => self.check_function(func),
            Stmt::Return(ret) => self.check_return(ret),
            Stmt::Display(display) => self.check_expr(&display.value).map(|_| ()),
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl) -> Result<(), TypeError> {
        let declared = self.resolve_type_ref(&decl.type_ref)?;
        if let Some(init) = &decl.init {
            let found = self.check_expr(init)?;
            expect_type(
                declared,
                found,
                || format!("initializer of '{}'", decl.name.name),
                init.span(),
            )?;
        }
        self.declare(&decl.name, Symbol::Variable(declared))
    }

    fn check_assign(&mut self, assign: &Assign) -> Result<(), TypeError> {
        let target = &assign.target;
        let expected = match self.lookup(&target.name) {
            Some(Symbol::Variable(ty)) => *ty,
            Some(Symbol::Function(_)) => {
                return Err(TypeError::AssignToFunction {
                    name: target.name.clone(),
                    span: target.span,
                })
            }
            None => {
                return Err(TypeError::UndefinedVariable {
                    name: target.name.clone(),
                    span: target.span,
                })
            }
        };
        let found = self.check_expr(&assign.value)?;
        expect_type(
            expected,
            found,
            || format!("assignment to '{}'", target.name),
            assign.value.span(),
        )
    }

    fn check_condition(&mut self, cond: &Expr) -> Result<(), TypeError> {
        let found = self.check_expr(cond)?;
        expect_type(Type::Bool, found, || "condition".to_string(), cond.span())
    }

    /// Check a function declaration
    ///
    /// The name is bound before the body is checked, so the body may recurse.
    fn check_function(&mut self, func: &FunctionDecl) -> Result<(), TypeError> {
        let params = func
            .params
            .iter()
            .map(|p| self.resolve_type_ref(&p.type_ref))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = func
            .return_type
            .as_ref()
            .map(|t| self.resolve_type_ref(t))
            .transpose()?;

        self.declare(
            &func.name,
            Symbol::Function(FunctionSig {
                params: params.clone(),
                return_type,
            }),
        )?;

        let saved = self.current_function.replace(FunctionContext {
            name: func.name.name.clone(),
            return_type,
        });
        self.scopes.push(HashMap::new());

        let result = func
            .params
            .iter()
            .zip(params)
            .try_for_each(|(param, ty)| self.declare(&param.name, Symbol::Variable(ty)))
            .and_then(|_| {
                func.body
                    .statements
                    .iter()
                    .try_for_each(|stmt| self.check_statement(stmt))
            });

        self.scopes.pop();
        self.current_function = saved;
        result?;

        if let Some(expected) = return_type {
            let returns = func
                .body
                .statements
                .iter()
                .any(|stmt| matches!(stmt, Stmt::Return(_)));
            if !returns {
                return Err(TypeError::MissingReturn {
                    name: func.name.name.clone(),
                    expected,
                    span: func.name.span,
                });
            }
        }
        Ok(())
    }

    fn check_return(&mut self, ret: &ReturnStmt) -> Result<(), TypeError> {
        let context = self
            .current_function
            .clone()
            .ok_or(TypeError::ReturnOutsideFunction { span: ret.span })?;

        match (&ret.value, context.return_type) {
            (None, None) => Ok(()),
            (Some(value), Some(expected)) => {
                let found = self.check_expr(value)?;
                expect_type(
                    expected,
                    found,
                    || format!("return value of '{}'", context.name),
                    value.span(),
                )
            }
            (None, Some(expected)) => Err(TypeError::MissingReturnValue {
                name: context.name,
                expected,
                span: ret.span,
            }),
            (Some(value), None) => Err(TypeError::UnexpectedReturnValue {
                name: context.name,
                span: value.span(),
            }),
        }
    }

    // === Scopes ===

    /// Bind a name in the innermost scope
    fn declare(&mut self, name: &Identifier, symbol: Symbol) -> Result<(), TypeError> {
        let duplicate = self
            .scopes
            .last()
            .is_some_and(|scope| scope.contains_key(&name.name));
        if duplicate {
            return Err(TypeError::DuplicateDeclaration {
                name: name.name.clone(),
                span: name.span,
            });
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.name.clone(), symbol);
        }
        Ok(())
    }

    /// Find the nearest binding of a name
    pub(super) fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn resolve_type_ref(&self, type_ref: &TypeRef) -> Result<Type, TypeError> {
        Type::from_name(&type_ref.name).ok_or_else(|| TypeError::NonexistentType {
            name: type_ref.name.clone(),
            span: type_ref.span,
        })
    }
}

/// Compare an expected type with the one found
pub(super) fn expect_type(
    expected: Type,
    found: Type,
    context: impl FnOnce() -> String,
    span: Span,
) -> Result<(), TypeError> {
    if expected == found {
        Ok(())
    } else {
        Err(TypeError::TypeMismatch {
            context: context(),
            expected,
            found,
            span,
        })
    }
}
