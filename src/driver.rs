//! Harness driver
//!
//! Sequences a complete run:
//!
//! 1. build the compiler invocation
//! 2. create the capture directories (idempotent)
//! 3. check the reference directories and load the report preamble
//! 4. scan the corpus
//! 5. run every test case in corpus order
//! 6. diff every capture against its reference
//! 7. write the report
//!
//! Any error aborts the run before the report is written, so a report on disk
//! is always complete.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::{HarnessConfig, StyleSource};
use crate::corpus::{TestCase, collect_test_cases};
use crate::error::{HarnessError, HarnessResult};
use crate::executor::{CompilerRunner, ExecutionOutcome, execute_all};
use crate::invocation::Invocation;
use crate::report::{DiffReport, compare_files, load_preamble};
use crate::reporter::{CaseResult, RunReporter, RunSummary, Verdict};

/// Run the whole harness once.
#[tracing::instrument(skip_all, fields(workdir = %config.working_dir.display()))]
pub fn run_harness(
    config: &HarnessConfig,
    runner: &dyn CompilerRunner,
    reporter: &mut dyn RunReporter,
) -> HarnessResult<RunSummary> {
    let start = Instant::now();

    let invocation = Invocation::from_config(config);
    tracing::info!(classpath = %invocation.classpath, "using {}", invocation.program);

    ensure_capture_dirs(config)?;
    check_reference_dirs(config)?;
    let preamble = load_preamble(&config.style_source())?;

    let cases = collect_test_cases(config)?;
    reporter.on_collection_complete(cases.len());

    let outcomes = execute_all(runner, &invocation, &cases, reporter)?;
    let (report, results) = compare_all(config, &cases, outcomes, reporter)?;

    let report_path = config.report_file();
    report.write_to(&report_path, &preamble)?;

    let summary = RunSummary {
        cases: results,
        report_path,
        duration: start.elapsed(),
    };
    reporter.on_run_complete(&summary);
    Ok(summary)
}

/// Create the results and errors capture directories if they are missing.
pub fn ensure_capture_dirs(config: &HarnessConfig) -> HarnessResult<()> {
    for dir in [config.results_path(), config.errors_path()] {
        fs::create_dir_all(&dir).map_err(|e| HarnessError::Io { path: dir.clone(), source: e })?;
    }
    Ok(())
}

fn check_reference_dirs(config: &HarnessConfig) -> HarnessResult<()> {
    let mut required = vec![config.reference_results_path()];
    if config.compare_errors {
        required.push(config.reference_errors_path());
    }
    match required.into_iter().find(|dir| !dir.is_dir()) {
        Some(path) => Err(HarnessError::DirectoryNotFound { path }),
        None => Ok(()),
    }
}

/// Diff every case against its reference, stopping at the first missing file.
#[tracing::instrument(skip_all, fields(cases = cases.len()))]
fn compare_all(
    config: &HarnessConfig,
    cases: &[TestCase],
    outcomes: Vec<ExecutionOutcome>,
    reporter: &mut dyn RunReporter,
) -> HarnessResult<(DiffReport, Vec<CaseResult>)> {
    let mut report = DiffReport::new();
    let mut results = Vec::with_capacity(cases.len());

    for (case, outcome) in cases.iter().zip(outcomes) {
        let table = compare_files(&case.output_capture, &case.reference_output, config.skip_header_lines)?;
        let verdict = Verdict::from_changed_rows(table.changed_rows());
        report.push(case.name.as_str(), table);

        // stderr carries no banner line
        let error_verdict = if config.compare_errors {
            let table = compare_files(&case.error_capture, &case.reference_error, 0)?;
            let verdict = Verdict::from_changed_rows(table.changed_rows());
            report.push(format!("{} (stderr)", case.name), table);
            Some(verdict)
        } else {
            None
        };

        let result = CaseResult {
            name: case.name.clone(),
            input: case.input.clone(),
            outcome,
            verdict,
            error_verdict,
        };
        reporter.on_case_compared(&result);
        results.push(result);
    }

    Ok((report, results))
}

/// Render a one-table report comparing two arbitrary files.
///
/// Returns the number of changed rows.
pub fn diff_files(
    candidate: &Path,
    reference: &Path,
    skip_header_lines: usize,
    style: &StyleSource,
    output: &Path,
) -> HarnessResult<usize> {
    let preamble = load_preamble(style)?;
    let table = compare_files(candidate, reference, skip_header_lines)?;
    let changed = table.changed_rows();

    let mut report = DiffReport::new();
    report.push(candidate.display().to_string(), table);
    report.write_to(output, &preamble)?;
    Ok(changed)
}
