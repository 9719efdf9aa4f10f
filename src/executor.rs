//! Test execution
//!
//! Runs the compiler once per test case with stdout and stderr redirected to
//! the case's capture files. Execution is strictly sequential: each child is
//! awaited before the next one starts, and there is no timeout.
//!
//! ## Failure policy
//!
//! A compiler that cannot be launched or exits non-zero does not stop the run.
//! The outcome is recorded and the difference surfaces in the report. Failing
//! to create a capture file is a harness error and aborts the run.
//!
//! The [`CompilerRunner`] trait separates process spawning from the driver so
//! tests and alternative runners can stand in for the real compiler.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::corpus::TestCase;
use crate::error::{HarnessError, HarnessResult};
use crate::invocation::Invocation;
use crate::reporter::RunReporter;

/// How a single compiler invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The process ran to completion. `None` when it was killed by a signal.
    Exited(Option<i32>),
    /// The process could not be started (missing executable, bad cwd, ...).
    LaunchFailed(String),
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        matches!(self, ExecutionOutcome::Exited(Some(0)))
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionOutcome::Exited(code) => *code,
            ExecutionOutcome::LaunchFailed(_) => None,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Exited(Some(code)) => write!(f, "exit status {}", code),
            ExecutionOutcome::Exited(None) => write!(f, "terminated by signal"),
            ExecutionOutcome::LaunchFailed(msg) => write!(f, "failed to launch: {}", msg),
        }
    }
}

/// Run the compiler for one test case, filling its capture files.
pub trait CompilerRunner {
    /// Blocks until the compiler has finished with `case`.
    ///
    /// Implementations must leave both `case.output_capture` and
    /// `case.error_capture` on disk (possibly empty) when they return `Ok`.
    fn run(&self, invocation: &Invocation, case: &TestCase) -> HarnessResult<ExecutionOutcome>;
}

/// Spawns the compiler as an OS process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }
}

impl CompilerRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation, case: &TestCase) -> HarnessResult<ExecutionOutcome> {
        let stdout = create_capture(&case.output_capture)?;
        let stderr = create_capture(&case.error_capture)?;

        let mut command = Command::new(&invocation.program);
        command
            .args(invocation.args_for(&case.input))
            .envs(invocation.env())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        tracing::debug!(?command, "spawning compiler");

        let outcome = match command.status() {
            Ok(status) => ExecutionOutcome::Exited(status.code()),
            Err(e) => ExecutionOutcome::LaunchFailed(e.to_string()),
        };

        match &outcome {
            ExecutionOutcome::Exited(Some(0)) => {}
            ExecutionOutcome::LaunchFailed(msg) => {
                tracing::warn!(test = %case.name, "could not launch {}: {}", invocation.program, msg);
            }
            other => tracing::debug!(test = %case.name, "compiler finished with {}", other),
        }

        Ok(outcome)
    }
}

/// Truncate-create a capture file.
fn create_capture(path: &Path) -> HarnessResult<File> {
    File::create(path).map_err(|e| HarnessError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a capture file for echoing; invalid UTF-8 is replaced.
pub fn read_capture(path: &Path) -> HarnessResult<String> {
    let bytes = fs::read(path).map_err(|e| HarnessError::from_io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run every test case in order.
///
/// Returns one outcome per case, in the same order as `cases`.
#[tracing::instrument(skip_all, fields(cases = cases.len()))]
pub fn execute_all(
    runner: &dyn CompilerRunner,
    invocation: &Invocation,
    cases: &[TestCase],
    reporter: &mut dyn RunReporter,
) -> HarnessResult<Vec<ExecutionOutcome>> {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        reporter.on_test_start(case, &invocation.command_line(&case.input));
        let outcome = runner.run(invocation, case)?;
        let captured = read_capture(&case.output_capture)?;
        reporter.on_test_complete(case, &outcome, &captured);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
