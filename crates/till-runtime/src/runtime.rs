//! Till runtime API for embedding

use crate::ast::Program;
use crate::diagnostic::{Diagnostic, Phase};
use crate::interpreter::Interpreter;
use crate::lexer::{LexError, Lexer};
use crate::output::{DisplayOutput, OutputWriter};
use crate::parser::{ParseError, Parser};
use crate::span::Span;
use crate::token::Token;
use crate::typechecker::{TypeChecker, TypeError};
use crate::value::RuntimeError;
use std::fmt;
use thiserror::Error;

/// Interpreter settings
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Calls allowed in progress at once
    pub max_call_depth: usize,
    /// Prefix written lines with their source line number
    pub line_numbers: bool,
    /// Sink each `display` is written to as it executes
    pub output: Option<OutputWriter>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: till_config::project::DEFAULT_MAX_CALL_DEPTH,
            line_numbers: false,
            output: None,
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("max_call_depth", &self.max_call_depth)
            .field("line_numbers", &self.line_numbers)
            .field("output", &self.output.as_ref().map(|_| "<writer>"))
            .finish()
    }
}

impl RuntimeConfig {
    /// Stream displays to `writer`
    pub fn with_output(mut self, writer: OutputWriter) -> Self {
        self.output = Some(writer);
        self
    }
}

impl From<&till_config::Config> for RuntimeConfig {
    fn from(config: &till_config::Config) -> Self {
        Self {
            max_call_depth: config.max_call_depth(),
            line_numbers: config.line_numbers(),
            output: None,
        }
    }
}

/// First error of a failed pipeline, tagged with its phase
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TillError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    /// Execution failed; `output` holds what was displayed before the failure
    #[error("{error}")]
    Runtime {
        error: RuntimeError,
        output: Vec<DisplayOutput>,
    },
}

impl TillError {
    pub fn phase(&self) -> Phase {
        match self {
            TillError::Lex(_) => Phase::Lex,
            TillError::Parse(_) => Phase::Parse,
            TillError::Type(_) => Phase::Type,
            TillError::Runtime { .. } => Phase::Runtime,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TillError::Lex(e) => e.span(),
            TillError::Parse(e) => e.span,
            TillError::Type(e) => e.span(),
            TillError::Runtime { error, .. } => error.span(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TillError::Lex(e) => e.to_diagnostic(),
            TillError::Parse(e) => e.to_diagnostic(),
            TillError::Type(e) => e.to_diagnostic(),
            TillError::Runtime { error, .. } => error.to_diagnostic(),
        }
    }
}

/// Stack reserved per allowed call level on the interpreter thread
pub const STACK_PER_CALL: usize = 64 * 1024;

/// Smallest interpreter thread stack
pub const MIN_STACK: usize = 64 * 1024 * 1024;

/// Till runtime instance
///
/// Runs the whole pipeline (lex, parse, check, interpret) and stops at the
/// first failing phase. Execution happens on a dedicated thread whose stack
/// is sized from `max_call_depth`, so exceeding the limit reports
/// `StackOverflow` whatever the caller's own stack size.
///
/// # Examples
///
/// ```
/// use till_runtime::Till;
///
/// let till = Till::new();
/// let output = till.run("display 1 + 2 * 3\n").unwrap();
/// assert_eq!(output[0].text, "7");
/// ```
pub struct Till {
    config: RuntimeConfig,
}

impl Till {
    /// Create a runtime with default settings and no output sink
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Lex source into tokens
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, TillError> {
        Ok(Lexer::new(source).tokenize()?)
    }

    /// Run the front end and return the checked program
    pub fn check(&self, source: &str) -> Result<Program, TillError> {
        let tokens = self.tokenize(source)?;
        let program = Parser::new(tokens).parse()?;
        TypeChecker::new().check(&program)?;
        tracing::debug!(statements = program.statements.len(), "program checked");
        Ok(program)
    }

    /// Check and execute a program, returning every display in order
    ///
    /// # Examples
    ///
    /// ```
    /// use till_runtime::{Till, TillError};
    ///
    /// let till = Till::new();
    /// match till.run("display 1\ndisplay 1 / 0\n") {
    ///     Err(TillError::Runtime { output, .. }) => assert_eq!(output[0].text, "1"),
    ///     other => panic!("unexpected result: {:?}", other),
    /// }
    /// ```
    pub fn run(&self, source: &str) -> Result<Vec<DisplayOutput>, TillError> {
        let program = self.check(source)?;
        self.execute(&program)
    }

    /// Execute an already checked program on the interpreter thread
    pub fn execute(&self, program: &Program) -> Result<Vec<DisplayOutput>, TillError> {
        let stack_size = interpreter_stack_size(self.config.max_call_depth);
        let config = &self.config;

        let (result, output) = std::thread::scope(|scope| {
            let spawned = std::thread::Builder::new()
                .name("till-interpreter".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, move || {
                    let mut interpreter = Interpreter::new(config);
                    let result = interpreter.run(program);
                    (result, interpreter.take_outputs())
                });

            match spawned {
                Ok(handle) => match handle.join() {
                    Ok(finished) => Ok(finished),
                    Err(panic) => std::panic::resume_unwind(panic),
                },
                Err(e) => Err(e),
            }
        })
        .map_err(|e| TillError::Runtime {
            error: RuntimeError::StackUnavailable {
                bytes: stack_size,
                msg: e.to_string(),
            },
            output: Vec::new(),
        })?;

        match result {
            Ok(()) => Ok(output),
            Err(error) => Err(TillError::Runtime { error, output }),
        }
    }
}

/// Stack needed to reach `max_call_depth` nested calls
pub fn interpreter_stack_size(max_call_depth: usize) -> usize {
    max_call_depth.saturating_mul(STACK_PER_CALL).max(MIN_STACK)
}

impl Default for Till {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_phases_fail_fast() {
        let till = Till::new();
        assert_eq!(till.run("display \"abc\n").unwrap_err().phase(), Phase::Lex);
        assert_eq!(till.run("display\n").unwrap_err().phase(), Phase::Parse);
        assert_eq!(till.run("display x\n").unwrap_err().phase(), Phase::Type);
        assert_eq!(
            till.run("display 1 / 0\n").unwrap_err().phase(),
            Phase::Runtime
        );
    }

    #[test]
    fn test_type_error_prevents_output() {
        let buf = SharedBuf::default();
        let writer: OutputWriter = Arc::new(Mutex::new(Box::new(buf.clone())));
        let till = Till::with_config(RuntimeConfig::default().with_output(writer));

        assert!(till.run("display 1\nNum x = \"no\"\n").is_err());
        assert!(buf.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_output_is_streamed_with_line_numbers() {
        let buf = SharedBuf::default();
        let writer: OutputWriter = Arc::new(Mutex::new(Box::new(buf.clone())));
        let config = RuntimeConfig {
            line_numbers: true,
            ..RuntimeConfig::default()
        }
        .with_output(writer);
        let till = Till::with_config(config);

        till.run("display 1\n\ndisplay \"x\"\n").unwrap();
        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "1: 1\n3: x\n");
    }

    #[test]
    fn test_config_conversion() {
        let config = till_config::Config::default();
        let runtime = RuntimeConfig::from(&config);
        assert_eq!(runtime.max_call_depth, 1000);
        assert!(!runtime.line_numbers);
        assert!(runtime.output.is_none());
    }

    #[test]
    fn test_stack_size_follows_depth() {
        assert_eq!(interpreter_stack_size(1), MIN_STACK);
        assert_eq!(interpreter_stack_size(4096), 4096 * STACK_PER_CALL);
        assert_eq!(interpreter_stack_size(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_runtime_diagnostic_code() {
        let err = Till::new().run("display 1 / 0\n").unwrap_err();
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, "TL4001");
        assert_eq!(diag.line, 1);
        assert_eq!(diag.column, 9);
    }
}
