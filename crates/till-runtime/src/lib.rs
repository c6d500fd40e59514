//! Till Runtime - Core language implementation
//!
//! This library provides the complete Till language runtime:
//! - Lexical analysis with indentation layout tokens
//! - Recursive-descent parsing
//! - Static type checking
//! - Tree-walking interpretation

/// Till runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod token;
pub mod typechecker;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{Diagnostic, Phase, DIAG_VERSION};
pub use interpreter::Interpreter;
pub use lexer::{LexError, Lexer};
pub use output::{stdout_writer, DisplayOutput, OutputWriter};
pub use parser::{ParseError, Parser};
pub use runtime::{RuntimeConfig, Till, TillError};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use typechecker::{TypeChecker, TypeError};
pub use types::{FunctionSig, Type};
pub use value::{RuntimeError, Value};
