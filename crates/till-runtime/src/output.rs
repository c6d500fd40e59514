//! Display output records and sinks

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared sink that `display` writes to
pub type OutputWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Writer for the process's standard output
pub fn stdout_writer() -> OutputWriter {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

/// One executed `display` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOutput {
    /// Formatted value
    pub text: String,
    /// Source line of the `display` statement
    pub line: u32,
}

impl DisplayOutput {
    /// Render as an output line, optionally prefixed with its source line
    pub fn render(&self, line_numbers: bool) -> String {
        if line_numbers {
            format!("{}: {}", self.line, self.text)
        } else {
            self.text.clone()
        }
    }
}
