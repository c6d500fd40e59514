//! Run command - execute Till source files

use anyhow::{bail, Result};
use till_runtime::{stdout_writer, RuntimeConfig, Till};

use super::{read_source, report};

/// Arguments for the run command
pub struct RunArgs {
    pub file: String,
    pub json: bool,
    pub line_numbers: bool,
    pub max_call_depth: Option<usize>,
}

/// Run a Till source file
///
/// CLI flags override values from till.toml and the environment.
pub fn run(args: RunArgs, project: &till_config::Config) -> Result<()> {
    let source = read_source(&args.file)?;

    let mut config = RuntimeConfig::from(project);
    if args.line_numbers {
        config.line_numbers = true;
    }
    if let Some(depth) = args.max_call_depth {
        if depth == 0 {
            bail!("--max-call-depth must be greater than 0");
        }
        config.max_call_depth = depth;
    }
    tracing::debug!(file = %args.file, ?config, "running");

    match Till::with_config(config.with_output(stdout_writer())).run(&source) {
        Ok(_) => Ok(()),
        Err(err) => Err(report(err.to_diagnostic(), &source, &args.file, args.json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(path: &str) -> RunArgs {
        RunArgs {
            file: path.to_string(),
            json: false,
            line_numbers: false,
            max_call_depth: None,
        }
    }

    #[test]
    fn test_run_simple_program() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Num x = 2\ndisplay x * 3").unwrap();

        let result = run(args(temp_file.path().to_str().unwrap()), &Default::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_missing_file() {
        let result = run(args("nonexistent.till"), &Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "display 1").unwrap();

        let mut run_args = args(temp_file.path().to_str().unwrap());
        run_args.max_call_depth = Some(0);
        assert!(run(run_args, &Default::default()).is_err());
    }

    #[test]
    fn test_runtime_error_is_reported() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "display 1 / 0").unwrap();

        let err = run(args(temp_file.path().to_str().unwrap()), &Default::default()).unwrap_err();
        assert!(err.downcast_ref::<crate::commands::Reported>().is_some());
    }
}
