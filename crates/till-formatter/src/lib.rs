//! Till Code Formatter
//!
//! Renders Till programs in canonical layout. Comments are not preserved.

mod formatter;
mod visitor;

pub use formatter::{FormatConfig, FormatResult, Formatter};

use till_runtime::ast::Program;

/// Format Till source code with default configuration
pub fn format_source(source: &str) -> FormatResult {
    let config = FormatConfig::default();
    format_source_with_config(source, &config)
}

/// Format Till source code with custom configuration
pub fn format_source_with_config(source: &str, config: &FormatConfig) -> FormatResult {
    let mut formatter = Formatter::new(config.clone());
    formatter.format(source)
}

/// Render an already parsed program
pub fn format_program(program: &Program, config: &FormatConfig) -> String {
    let mut visitor = visitor::FormatVisitor::new(config.clone());
    visitor.visit_program(program);
    visitor.into_output()
}

/// Check if source code is already formatted (without modifying)
pub fn check_formatted(source: &str) -> bool {
    check_formatted_with_config(source, &FormatConfig::default())
}

/// Check if source code is already formatted with custom configuration
pub fn check_formatted_with_config(source: &str, config: &FormatConfig) -> bool {
    match format_source_with_config(source, config) {
        FormatResult::Ok(formatted) => formatted == source,
        FormatResult::Error(_) => false,
    }
}
