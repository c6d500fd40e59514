//! Type representation for the type checker

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static type of a value or expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Num,
    Str,
    Char,
    Bool,
    /// Result of calling a function without a return type; never nameable
    Void,
}

impl Type {
    /// Resolve a source type name; `Void` cannot be written
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "Num" => Some(Type::Num),
            "Str" => Some(Type::Str),
            "Char" => Some(Type::Char),
            "Bool" => Some(Type::Bool),
            _ => None,
        }
    }

    /// Get the display name for this type
    pub fn display_name(&self) -> &'static str {
        match self {
            Type::Num => "Num",
            Type::Str => "Str",
            Type::Char => "Char",
            Type::Bool => "Bool",
            Type::Void => "Void",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Signature of a declared function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub params: Vec<Type>,
    /// `None` for functions declared without `-> Type`
    pub return_type: Option<Type>,
}

impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|t| t.display_name()).collect();
        write!(f, "({})", params.join(", "))?;
        if let Some(ret) = self.return_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}
