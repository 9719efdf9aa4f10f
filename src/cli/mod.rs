//! CLI module for the goldrun harness
//!
//! ## Commands
//!
//! - *(no subcommand)* - run the corpus and write the HTML report
//! - `diff <candidate> <reference>` - diff two files into a one-table report
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::PathListSeparator;
use crate::error::HarnessError;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        // Debug formatting of a Report renders the graphical diagnostic
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Golden-output regression harness for compiler assignments
#[derive(Parser, Debug)]
#[command(name = "goldrun")]
#[command(version = VERSION)]
#[command(about = "Run a compiler over a test corpus and diff its output against golden results", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options of a harness run. Every option defaults to the standard layout.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Base directory for every relative path (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Directory containing the test inputs
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// File name suffix of test inputs
    #[arg(long, value_name = "SUFFIX")]
    pub extension: Option<String>,

    /// Where captured stdout is written
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Where captured stderr is written
    #[arg(long, value_name = "DIR")]
    pub errors_dir: Option<PathBuf>,

    /// Directory of golden stdout captures
    #[arg(long, value_name = "DIR")]
    pub reference_results: Option<PathBuf>,

    /// Directory of golden stderr captures
    #[arg(long, value_name = "DIR")]
    pub reference_errors: Option<PathBuf>,

    /// Executable to launch per test input
    #[arg(long, value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Classpath fragment, relative to the working directory (repeatable)
    #[arg(long = "classpath", value_name = "PATH")]
    pub classpath: Vec<String>,

    /// Main class / entry point
    #[arg(long = "main", value_name = "ENTRY")]
    pub main_entry: Option<String>,

    /// Extra argument passed after the entry point (repeatable)
    #[arg(long = "main-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub main_args: Vec<String>,

    /// Classpath separator convention (default: this platform's)
    #[arg(long, value_enum, value_name = "STYLE")]
    pub path_separator: Option<PathListSeparator>,

    /// Banner lines ignored at the top of each capture
    #[arg(long, value_name = "N")]
    pub skip_header_lines: Option<usize>,

    /// HTML fragment prepended to the report (default: style.html if present)
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Report file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also diff stderr captures against the reference errors
    #[arg(long)]
    pub compare_errors: bool,

    /// Do not echo captured output to the console
    #[arg(long)]
    pub no_echo: bool,

    /// Write a JSON run summary to FILE
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Exit with status 1 when any test differs from its reference
    #[arg(long)]
    pub fail_on_diff: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Diff two files into a single-table HTML report
    Diff {
        /// Candidate output
        #[arg(value_name = "CANDIDATE")]
        candidate: PathBuf,
        /// Reference output
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,
        /// Report file
        #[arg(short, long, value_name = "FILE", default_value = "diff.html")]
        output: PathBuf,
        /// Banner lines ignored at the top of each file
        #[arg(long, value_name = "N", default_value_t = crate::config::DEFAULT_SKIP_HEADER_LINES)]
        skip_header_lines: usize,
        /// HTML fragment prepended to the report
        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,
        /// Exit with status 1 when the files differ
        #[arg(long)]
        fail_on_diff: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Diff {
            candidate,
            reference,
            output,
            skip_header_lines,
            style,
            fail_on_diff,
        }) => commands::diff_command(&candidate, &reference, &output, skip_header_lines, style, fail_on_diff),
        None => commands::run_command(cli.run),
    }
}

// ============================================================================
// Tests
// ============================================================================
