//! Check command - type-check Till source files without executing

use anyhow::Result;
use till_runtime::Till;

use super::{read_source, report};

/// Type-check a Till source file without executing it
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = read_source(file_path)?;

    match Till::new().check(&source) {
        Ok(_) => {
            if !json {
                println!("{}: no errors found", file_path);
            }
            Ok(())
        }
        Err(err) => Err(report(err.to_diagnostic(), &source, file_path, json)),
    }
}
