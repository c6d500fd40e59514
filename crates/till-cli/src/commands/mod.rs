//! Subcommand implementations

pub mod ast;
pub mod check;
pub mod fmt;
pub mod run;
pub mod tokens;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;
use till_runtime::Diagnostic;

/// Marker error: the failure was already printed as a diagnostic
#[derive(Debug, Error)]
#[error("diagnostics reported")]
pub struct Reported;

/// Load till.toml from the working directory or one of its parents
pub fn load_project_config() -> Result<till_config::Config> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    till_config::ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load till.toml")
}

pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))
}

/// Print a diagnostic to stderr and return the marker error
pub fn report(diag: Diagnostic, source: &str, file: &str, json: bool) -> anyhow::Error {
    let diag = diag.with_source(source).with_file(file);
    match json.then(|| diag.to_json_compact()) {
        Some(Ok(line)) => eprintln!("{}", line),
        _ => eprintln!("{}", diag.to_human_string()),
    }
    Reported.into()
}
