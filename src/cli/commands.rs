//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{HarnessConfig, StyleSource};
use crate::driver::{diff_files, run_harness};
use crate::executor::ProcessRunner;
use crate::reporter::ConsoleReporter;

use super::{CliError, CliResult, ExitCode, RunArgs};

/// Build the harness configuration from command-line options.
///
/// Unset options keep their defaults. Relative paths stay relative and are
/// resolved against the working directory when used.
pub fn build_config(args: RunArgs, cwd: &Path) -> HarnessConfig {
    let mut config = HarnessConfig::new();

    config.working_dir = match args.workdir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };

    if let Some(corpus) = args.corpus {
        config.corpus_dir = corpus;
    }
    if let Some(extension) = args.extension {
        config.extension = extension;
    }
    if let Some(dir) = args.results_dir {
        config.results_dir = dir;
    }
    if let Some(dir) = args.errors_dir {
        config.errors_dir = dir;
    }
    if let Some(dir) = args.reference_results {
        config.reference_results_dir = dir;
    }
    if let Some(dir) = args.reference_errors {
        config.reference_errors_dir = dir;
    }
    if let Some(program) = args.program {
        config.program = program;
    }
    if !args.classpath.is_empty() {
        config.classpath = args.classpath;
    }
    if let Some(main_entry) = args.main_entry {
        config.main_entry = main_entry;
    }
    config.main_args = args.main_args;
    config.separator = args.path_separator.unwrap_or_default();
    if let Some(lines) = args.skip_header_lines {
        config.skip_header_lines = lines;
    }
    config.style = args.style.map_or(StyleSource::Auto, StyleSource::File);
    if let Some(output) = args.output {
        config.report_path = output;
    }
    config.compare_errors = args.compare_errors;
    config.echo_output = !args.no_echo;

    config
}

/// Run the harness over the configured corpus.
pub fn run_command(args: RunArgs) -> CliResult<ExitCode> {
    let cwd = env::current_dir()
        .map_err(|e| CliError::failure(format!("Error: cannot determine current directory: {}", e)))?;

    let summary_json = args.summary_json.clone();
    let fail_on_diff = args.fail_on_diff;
    let config = build_config(args, &cwd);

    let runner = ProcessRunner::new(&config.working_dir);
    let mut reporter = ConsoleReporter::new(config.echo_output);
    let summary = run_harness(&config, &runner, &mut reporter)?;

    if let Some(path) = summary_json {
        let path = config.resolve(&path);
        let json = serde_json::to_string_pretty(&summary.to_json())
            .map_err(|e| CliError::failure(format!("Error serializing summary: {}", e)))?;
        fs::write(&path, json)
            .map_err(|e| CliError::failure(format!("Error writing {}: {}", path.display(), e)))?;
    }

    if fail_on_diff && !summary.all_passed() {
        // Summary already printed
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Diff two files into a single-table report.
pub fn diff_command(
    candidate: &Path,
    reference: &Path,
    output: &Path,
    skip_header_lines: usize,
    style: Option<PathBuf>,
    fail_on_diff: bool,
) -> CliResult<ExitCode> {
    let style = match style {
        Some(path) => StyleSource::File(path),
        None => StyleSource::Builtin,
    };
    let changed = diff_files(candidate, reference, skip_header_lines, &style, output)?;

    if changed == 0 {
        println!("no differences ({})", output.display());
    } else {
        println!("{} changed line(s) ({})", changed, output.display());
    }

    if fail_on_diff && changed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::PathListSeparator;

    #[test]
    fn test_build_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = build_config(RunArgs::default(), dir.path());
        assert_eq!(config.working_dir, dir.path());
        assert_eq!(config.classpath, vec!["bin", "java-cup-11b.jar"]);
        assert_eq!(config.style, StyleSource::Auto);
        assert_eq!(config.style_source(), StyleSource::Builtin);
        assert!(config.echo_output);
        assert!(!config.compare_errors);
    }

    #[test]
    fn test_build_config_picks_up_style_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("style.html"), "<html><body>").unwrap();
        let config = build_config(RunArgs::default(), dir.path());
        assert_eq!(config.style_source(), StyleSource::File(dir.path().join("style.html")));
    }

    #[test]
    fn test_build_config_relative_style_option() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            style: Some(PathBuf::from("report/style.html")),
            ..RunArgs::default()
        };
        let config = build_config(args, dir.path());
        assert_eq!(config.style_source(), StyleSource::File(dir.path().join("report/style.html")));
    }

    #[test]
    fn test_build_config_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            workdir: Some(PathBuf::from("assignment")),
            classpath: vec!["out".to_string()],
            main_entry: Some("pl0.PL0_RD".to_string()),
            main_args: vec!["-c".to_string()],
            path_separator: Some(PathListSeparator::Windows),
            skip_header_lines: Some(0),
            no_echo: true,
            ..RunArgs::default()
        };
        let config = build_config(args, dir.path());
        assert_eq!(config.working_dir, dir.path().join("assignment"));
        assert_eq!(config.classpath, vec!["out"]);
        assert_eq!(config.main_entry, "pl0.PL0_RD");
        assert_eq!(config.main_args, vec!["-c"]);
        assert_eq!(config.separator, PathListSeparator::Windows);
        assert_eq!(config.skip_header_lines, 0);
        assert!(!config.echo_output);
    }
}
