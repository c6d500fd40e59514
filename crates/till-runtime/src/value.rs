//! Runtime value representation
//!
//! Values are cheap to clone: strings share their text through `Rc<str>` and
//! function values share their declaration through `Rc<Function>`.

use crate::ast::FunctionDecl;
use crate::interpreter::ScopeId;
use crate::span::Span;
use crate::types::Type;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Number (f64)
    Num(f64),
    /// String (immutable, reference-counted)
    Str(Rc<str>),
    /// Character
    Char(char),
    /// Boolean
    Bool(bool),
    /// User-defined function with its defining scope
    Function(Rc<Function>),
    /// Result of a call to a function without a return type
    Void,
}

/// A declared function closed over the scope it was declared in
#[derive(Debug)]
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    /// Scope the declaration executed in; calls run in a child of it
    pub closure: ScopeId,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.decl.name.name
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Value a declaration without initializer starts with
    pub fn zero(ty: Type) -> Self {
        match ty {
            Type::Num => Value::Num(0.0),
            Type::Str => Value::string(""),
            Type::Char => Value::Char('\0'),
            Type::Bool => Value::Bool(false),
            Type::Void => Value::Void,
        }
    }

    /// Static type of this value; functions have none
    pub fn type_of(&self) -> Option<Type> {
        match self {
            Value::Num(_) => Some(Type::Num),
            Value::Str(_) => Some(Type::Str),
            Value::Char(_) => Some(Type::Char),
            Value::Bool(_) => Some(Type::Bool),
            Value::Void => Some(Type::Void),
            Value::Function(_) => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self.type_of() {
            Some(ty) => ty.display_name(),
            None => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => {
                // Whole numbers print without a fractional part; -0 prints as 0
                if *n == 0.0 {
                    write!(f, "0")
                } else if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s.as_ref()),
            Value::Char(c) => write!(f, "{}", c),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
            Value::Void => write!(f, "void"),
        }
    }
}

/// Runtime error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Division by zero
    #[error("division by zero at {span}")]
    DivideByZero { span: Span },
    /// Arithmetic produced NaN or an infinity
    #[error("invalid numeric result (overflow or NaN) at {span}")]
    InvalidNumericResult { span: Span },
    /// Call depth exceeded the configured limit
    #[error("stack overflow: call depth exceeded {limit} at {span}")]
    StackOverflow { limit: usize, span: Span },
    /// Undefined variable (only reachable for unchecked programs)
    #[error("undefined variable '{name}' at {span}")]
    UndefinedVariable { name: String, span: Span },
    /// Operand of the wrong kind (only reachable for unchecked programs)
    #[error("type error at {span}: {msg}")]
    TypeMismatch { msg: String, span: Span },
    /// The output sink rejected a write
    #[error("failed to write output at {span}: {msg}")]
    OutputFailed { msg: String, span: Span },
    /// The interpreter thread could not get its stack
    #[error("could not start the interpreter with a {bytes}-byte stack: {msg}")]
    StackUnavailable { bytes: usize, msg: String },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::DivideByZero { span }
            | RuntimeError::InvalidNumericResult { span }
            | RuntimeError::StackOverflow { span, .. }
            | RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::OutputFailed { span, .. } => *span,
            RuntimeError::StackUnavailable { .. } => Span::dummy(),
        }
    }

    /// Diagnostic code (TL4xxx)
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::DivideByZero { .. } => "TL4001",
            RuntimeError::InvalidNumericResult { .. } => "TL4002",
            RuntimeError::StackOverflow { .. } => "TL4003",
            RuntimeError::UndefinedVariable { .. } => "TL4004",
            RuntimeError::TypeMismatch { .. } => "TL4005",
            RuntimeError::OutputFailed { .. } => "TL4006",
            RuntimeError::StackUnavailable { .. } => "TL4007",
        }
    }

    pub fn to_diagnostic(&self) -> crate::diagnostic::Diagnostic {
        let diag = crate::diagnostic::Diagnostic::error_with_code(
            crate::diagnostic::Phase::Runtime,
            self.code(),
            self.to_string(),
            self.span(),
        )
        .with_label("runtime error");
        match self {
            RuntimeError::StackOverflow { .. } => {
                diag.with_help("check the recursion's base case or raise max_call_depth")
            }
            RuntimeError::StackUnavailable { .. } => {
                diag.with_help("lower max_call_depth")
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Num(120.0).to_string(), "120");
        assert_eq!(Value::Num(-4.0).to_string(), "-4");
        assert_eq!(Value::Num(2.5).to_string(), "2.5");
        assert_eq!(Value::Num(-0.0).to_string(), "0");
    }

    #[test]
    fn test_text_display_is_raw() {
        assert_eq!(Value::string("a \"b\"").to_string(), "a \"b\"");
        assert_eq!(Value::Char('x').to_string(), "x");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(Type::Num), Value::Num(0.0));
        assert_eq!(Value::zero(Type::Str), Value::string(""));
        assert_eq!(Value::zero(Type::Char), Value::Char('\0'));
        assert_eq!(Value::zero(Type::Bool), Value::Bool(false));
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(Value::string("ab"), Value::string("ab"));
        assert_ne!(Value::Num(1.0), Value::Bool(true));
        assert_ne!(Value::Char('1'), Value::string("1"));
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Num(1.0).type_of(), Some(Type::Num));
        assert_eq!(Value::Void.type_name(), "Void");
    }
}
