use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Till language toolchain.
///
/// Till is a small, indentation-structured, statically typed language.
/// This CLI runs, checks, inspects and formats Till programs.
///
/// EXAMPLES:
///     till run main.till           Run a program
///     till check main.till         Type-check without running
///     till fmt main.till --check   Check formatting
///
/// ENVIRONMENT VARIABLES:
///     TILL_LOG              Log filter, e.g. 'debug' or 'till_runtime=trace' (default: warn)
///     TILL_DIAGNOSTICS      Set to 'json' for JSON diagnostics by default
///     TILL_MAX_CALL_DEPTH   Override runtime.max_call_depth
///     TILL_LINE_NUMBERS     Override output.line_numbers
#[derive(Parser)]
#[command(name = "till")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Till source file
    ///
    /// Checks the program, then executes it. Each `display` prints one line
    /// to stdout as it runs.
    ///
    /// EXAMPLES:
    ///     till run main.till                    Run a program
    ///     till run main.till --line-numbers     Prefix output with source lines
    ///     till run main.till --json             Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Till source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Prefix each displayed line with its source line number
        #[arg(long)]
        line_numbers: bool,
        /// Maximum nesting of function calls
        #[arg(long)]
        max_call_depth: Option<usize>,
    },

    /// Type-check a Till source file without running
    #[command(visible_alias = "c")]
    Check {
        /// Path to the Till source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream, including layout tokens
    Tokens {
        /// Path to the Till source file
        file: String,
    },

    /// Dump AST to JSON
    Ast {
        /// Path to the Till source file
        file: String,
    },

    /// Format Till source files in place
    ///
    /// EXAMPLES:
    ///     till fmt main.till                    Rewrite the file
    ///     till fmt main.till --check            Fail if the file needs formatting
    ///     till fmt main.till --indent-size 2
    #[command(visible_alias = "f")]
    Fmt {
        /// Files to format
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
        /// Indentation size in spaces (default: formatting.indent or 4)
        #[arg(long)]
        indent_size: Option<usize>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Diagnostics have already been printed
            if err.downcast_ref::<commands::Reported>().is_none() {
                eprintln!("error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Run {
            file,
            json,
            line_numbers,
            max_call_depth,
        } => {
            let project = commands::load_project_config()?;
            let args = commands::run::RunArgs {
                file,
                json: json || cli_config.default_json,
                line_numbers,
                max_call_depth,
            };
            commands::run::run(args, &project)
        }
        Commands::Check { file, json } => {
            commands::check::run(&file, json || cli_config.default_json)
        }
        Commands::Tokens { file } => commands::tokens::run(&file, cli_config.default_json),
        Commands::Ast { file } => commands::ast::run(&file, cli_config.default_json),
        Commands::Fmt {
            files,
            check,
            indent_size,
        } => {
            let project = commands::load_project_config()?;
            let args = commands::fmt::FmtArgs {
                files,
                check,
                indent_size: indent_size.unwrap_or_else(|| project.indent()),
                json: cli_config.default_json,
            };
            commands::fmt::run(args)
        }
    }
}
