//! Till code formatter CLI command

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use till_formatter::{format_source_with_config, FormatConfig, FormatResult};

use super::{read_source, report, Reported};

/// Arguments for the fmt command
pub struct FmtArgs {
    pub files: Vec<PathBuf>,
    pub check: bool,
    pub indent_size: usize,
    pub json: bool,
}

/// Run the fmt command
///
/// Every file is processed even when an earlier one fails.
pub fn run(args: FmtArgs) -> Result<()> {
    let range = till_config::project::INDENT_RANGE;
    if !range.contains(&args.indent_size) {
        bail!(
            "--indent-size must be between {} and {}",
            range.start(),
            range.end()
        );
    }
    let config = FormatConfig::default().with_indent_size(args.indent_size);

    let mut failed = false;
    let mut unformatted = Vec::new();

    for path in &args.files {
        let display = path.display().to_string();
        let source = read_source(path)?;

        let formatted = match format_source_with_config(&source, &config) {
            FormatResult::Ok(formatted) => formatted,
            FormatResult::Error(diag) => {
                report(diag, &source, &display, args.json);
                failed = true;
                continue;
            }
        };

        if formatted == source {
            continue;
        }
        if args.check {
            unformatted.push(display);
        } else {
            fs::write(path, &formatted)
                .with_context(|| format!("Failed to write {}", display))?;
            println!("Formatted {}", display);
        }
    }

    if !unformatted.is_empty() {
        for file in &unformatted {
            eprintln!("Would reformat: {}", file);
        }
        bail!(
            "{} file(s) need formatting; run `till fmt` to fix",
            unformatted.len()
        );
    }
    if failed {
        return Err(Reported.into());
    }
    Ok(())
}
