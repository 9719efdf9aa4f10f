//! Run reporting
//!
//! ## RunReporter Trait
//!
//! The driver uses a `RunReporter` trait to separate console output from
//! execution. [`ConsoleReporter`] reproduces the classic harness output: the
//! `>>>` command line, the echoed capture, and a summary banner at the end.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use crate::corpus::TestCase;
use crate::executor::ExecutionOutcome;

// ============================================================================
// Verdicts
// ============================================================================

/// Comparison result for one capture against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No changed rows after the header lines were dropped
    Passed,
    /// At least one row differs
    Differs { changed_rows: usize },
}

impl Verdict {
    pub fn from_changed_rows(changed_rows: usize) -> Self {
        if changed_rows == 0 {
            Verdict::Passed
        } else {
            Verdict::Differs { changed_rows }
        }
    }

    pub fn passed(self) -> bool {
        matches!(self, Verdict::Passed)
    }

    fn label(self) -> &'static str {
        match self {
            Verdict::Passed => "passed",
            Verdict::Differs { .. } => "differs",
        }
    }
}

/// Everything known about one test case after the run.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub input: PathBuf,
    pub outcome: ExecutionOutcome,
    /// stdout capture vs. reference
    pub verdict: Verdict,
    /// stderr capture vs. reference, when error comparison is enabled
    pub error_verdict: Option<Verdict>,
}

impl CaseResult {
    /// Passed when every compared stream matches its reference.
    pub fn passed(&self) -> bool {
        self.verdict.passed() && self.error_verdict.is_none_or(Verdict::passed)
    }
}

/// Summary of a harness run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cases: Vec<CaseResult>,
    pub report_path: PathBuf,
    pub duration: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn differing(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn launch_failures(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.outcome, ExecutionOutcome::LaunchFailed(_)))
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }

    /// Machine-readable form of the summary.
    pub fn to_json(&self) -> serde_json::Value {
        let cases: Vec<_> = self
            .cases
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "input": c.input.display().to_string(),
                    "outcome": c.outcome.to_string(),
                    "exit_code": c.outcome.exit_code(),
                    "verdict": c.verdict.label(),
                    "changed_rows": changed_rows(c.verdict),
                    "error_verdict": c.error_verdict.map(Verdict::label),
                    "error_changed_rows": c.error_verdict.map(changed_rows),
                })
            })
            .collect();

        json!({
            "total": self.total(),
            "passed": self.passed(),
            "differing": self.differing(),
            "launch_failures": self.launch_failures(),
            "duration_secs": self.duration.as_secs_f64(),
            "report": self.report_path.display().to_string(),
            "cases": cases,
        })
    }
}

fn changed_rows(verdict: Verdict) -> usize {
    match verdict {
        Verdict::Passed => 0,
        Verdict::Differs { changed_rows } => changed_rows,
    }
}

// ============================================================================
// Reporter trait
// ============================================================================

/// Trait for reporting harness progress.
///
/// Implement this trait to customize output (quiet mode, JSON lines, ...).
pub trait RunReporter {
    /// Called once the corpus has been scanned
    fn on_collection_complete(&mut self, _count: usize) {}

    /// Called right before the compiler is spawned for `case`
    fn on_test_start(&mut self, case: &TestCase, command_line: &str);

    /// Called after the compiler finished, with the captured stdout
    fn on_test_complete(&mut self, case: &TestCase, outcome: &ExecutionOutcome, captured: &str);

    /// Called after a case has been compared against its reference
    fn on_case_compared(&mut self, _result: &CaseResult) {}

    /// Called once the report has been written
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Default console reporter
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    /// Echo each captured stdout after its run
    pub echo: bool,
}

impl ConsoleReporter {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }

    /// The line printed before the compiler is spawned.
    pub fn start_line(command_line: &str) -> String {
        format!(">>> {}", command_line)
    }

    /// The capture echo: a `Reading file` header, then the captured text.
    pub fn echo_block(case: &TestCase, captured: &str) -> String {
        format!("Reading file {}\n{}", case.output_capture.display(), captured)
    }
}

impl RunReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, count: usize) {
        if count == 0 {
            eprintln!("No tests collected");
        }
    }

    fn on_test_start(&mut self, _case: &TestCase, command_line: &str) {
        println!("{}", Self::start_line(command_line));
    }

    fn on_test_complete(&mut self, case: &TestCase, outcome: &ExecutionOutcome, captured: &str) {
        if let ExecutionOutcome::LaunchFailed(msg) = outcome {
            eprintln!("\x1b[31m{}: failed to launch compiler: {}\x1b[0m", case.name, msg);
        }
        if self.echo {
            println!("{}", Self::echo_block(case, captured));
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let mut parts = Vec::new();
        if summary.passed() > 0 {
            parts.push(format!("\x1b[32m{} passed\x1b[0m", summary.passed()));
        }
        if summary.differing() > 0 {
            parts.push(format!("\x1b[31m{} differ\x1b[0m", summary.differing()));
        }
        if summary.launch_failures() > 0 {
            parts.push(format!("\x1b[33m{} failed to launch\x1b[0m", summary.launch_failures()));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        for case in summary.cases.iter().filter(|c| !c.passed()) {
            eprintln!("\x1b[31mDIFF\x1b[0m {} ({})", case.name, case.outcome);
        }

        eprintln!(
            "====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        eprintln!("report written to {}", summary.report_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, verdict: Verdict, error_verdict: Option<Verdict>, outcome: ExecutionOutcome) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            input: PathBuf::from(name),
            outcome,
            verdict,
            error_verdict,
        }
    }

    fn summary(cases: Vec<CaseResult>) -> RunSummary {
        RunSummary {
            cases,
            report_path: PathBuf::from("output.html"),
            duration: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_console_start_line() {
        assert_eq!(
            ConsoleReporter::start_line("java -cp \"/w/bin\" pl0.PL0_LALR /w/test-pgm/a.pl0"),
            ">>> java -cp \"/w/bin\" pl0.PL0_LALR /w/test-pgm/a.pl0"
        );
    }

    #[test]
    fn test_console_echo_block() {
        let config = crate::config::HarnessConfig::new().with_working_dir("/w");
        let case = TestCase::new("a.pl0", &config);
        assert_eq!(
            ConsoleReporter::echo_block(&case, "HEADER\nOK\n"),
            "Reading file /w/my-test-results/r-a.pl0\nHEADER\nOK\n"
        );
    }

    #[test]
    fn test_verdict_from_changed_rows() {
        assert_eq!(Verdict::from_changed_rows(0), Verdict::Passed);
        assert_eq!(Verdict::from_changed_rows(2), Verdict::Differs { changed_rows: 2 });
    }

    #[test]
    fn test_case_passes_only_when_all_streams_match() {
        let ok = ExecutionOutcome::Exited(Some(0));
        assert!(case("a", Verdict::Passed, None, ok.clone()).passed());
        assert!(case("a", Verdict::Passed, Some(Verdict::Passed), ok.clone()).passed());
        assert!(!case("a", Verdict::Passed, Some(Verdict::Differs { changed_rows: 1 }), ok.clone()).passed());
        assert!(!case("a", Verdict::Differs { changed_rows: 1 }, None, ok).passed());
    }

    #[test]
    fn test_summary_counts() {
        let s = summary(vec![
            case("a", Verdict::Passed, None, ExecutionOutcome::Exited(Some(0))),
            case(
                "b",
                Verdict::Differs { changed_rows: 3 },
                None,
                ExecutionOutcome::LaunchFailed("missing".into()),
            ),
        ]);
        assert_eq!(s.total(), 2);
        assert_eq!(s.passed(), 1);
        assert_eq!(s.differing(), 1);
        assert_eq!(s.launch_failures(), 1);
        assert!(!s.all_passed());
    }

    #[test]
    fn test_empty_summary_all_passed() {
        assert!(summary(Vec::new()).all_passed());
    }

    #[test]
    fn test_summary_json() {
        let s = summary(vec![case(
            "prog1.pl0",
            Verdict::Differs { changed_rows: 2 },
            Some(Verdict::Passed),
            ExecutionOutcome::Exited(Some(1)),
        )]);
        let value = s.to_json();
        assert_eq!(value["total"], 1);
        assert_eq!(value["differing"], 1);
        assert_eq!(value["report"], "output.html");
        assert_eq!(value["cases"][0]["name"], "prog1.pl0");
        assert_eq!(value["cases"][0]["verdict"], "differs");
        assert_eq!(value["cases"][0]["changed_rows"], 2);
        assert_eq!(value["cases"][0]["exit_code"], 1);
        assert_eq!(value["cases"][0]["error_verdict"], "passed");
    }
}
