#![forbid(unsafe_code)]
//! goldrun - golden-output regression harness
//!
//! Runs an external compiler over every input file of a test corpus, captures
//! its stdout and stderr, and writes an HTML report of side-by-side diffs
//! against a set of reference ("golden") captures.
//!
//! Everything runs sequentially in one thread: one compiler process at a time,
//! each awaited before the next. A compiler that crashes or cannot be started
//! does not stop the run; the damage shows up in the report.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod driver;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod report;
pub mod reporter;

pub use config::{HarnessConfig, PathListSeparator, StyleSource};
pub use corpus::{TestCase, scan_corpus};
pub use driver::run_harness;
pub use error::{HarnessError, HarnessResult};
pub use executor::{CompilerRunner, ExecutionOutcome, ProcessRunner};
pub use invocation::{Classpath, Invocation, build_classpath};
pub use report::{DiffReport, compare_files};
pub use reporter::{CaseResult, ConsoleReporter, RunReporter, RunSummary, Verdict};
