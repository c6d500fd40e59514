//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation over an arena of scopes.
//! Supports:
//! - Statement execution (declarations, assignments, `if`, `while`, `display`)
//! - Function declarations closing over their defining scope
//! - Calls with a configurable depth limit
//! - Block scoping with shadowing

mod env;
mod expr;
mod stmt;

pub use env::{Binding, Environment, ScopeId};

use crate::ast::Program;
use crate::output::{DisplayOutput, OutputWriter};
use crate::runtime::RuntimeConfig;
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::io::Write;

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ControlFlow {
    Normal,
    Return(Value),
}

/// Interpreter state
pub struct Interpreter {
    pub(super) env: Environment,
    /// Calls currently in progress
    pub(super) call_depth: usize,
    pub(super) max_call_depth: usize,
    line_numbers: bool,
    output: Option<OutputWriter>,
    /// Every display produced by the current run, in order
    outputs: Vec<DisplayOutput>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            env: Environment::new(),
            call_depth: 0,
            max_call_depth: config.max_call_depth,
            line_numbers: config.line_numbers,
            output: config.output.clone(),
            outputs: Vec::new(),
        }
    }

    /// Run a checked program from a fresh global scope
    ///
    /// Outputs produced before an error stay available through `outputs`.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.env = Environment::new();
        self.call_depth = 0;
        self.outputs.clear();

        let global = self.env.global();
        let result = self.exec_statements(&program.statements, global);
        tracing::debug!(
            outputs = self.outputs.len(),
            ok = result.is_ok(),
            "program finished"
        );
        result.map(|_| ())
    }

    /// Outputs of the last run
    pub fn outputs(&self) -> &[DisplayOutput] {
        &self.outputs
    }

    /// Move the outputs of the last run out of the interpreter
    pub fn take_outputs(&mut self) -> Vec<DisplayOutput> {
        std::mem::take(&mut self.outputs)
    }

    /// Record a display and write it to the sink, if any
    pub(super) fn emit(&mut self, output: DisplayOutput, span: Span) -> Result<(), RuntimeError> {
        if let Some(writer) = &self.output {
            let failed = |msg: String| RuntimeError::OutputFailed { msg, span };
            let mut sink = writer
                .lock()
                .map_err(|_| failed("output writer lock poisoned".to_string()))?;
            writeln!(sink, "{}", output.render(self.line_numbers))
                .and_then(|_| sink.flush())
                .map_err(|e| failed(e.to_string()))?;
        }
        self.outputs.push(output);
        Ok(())
    }
}
