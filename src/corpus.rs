//! Test corpus discovery
//!
//! A test case is a single input file in the corpus directory. Its capture and
//! reference files are named from the input's file name:
//!
//! - `r-<name>` - stdout (captured in the results dir, golden in the reference results dir)
//! - `e-<name>` - stderr (captured in the errors dir, golden in the reference errors dir)

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};

/// Prefix of stdout capture files.
pub const RESULT_PREFIX: &str = "r-";
/// Prefix of stderr capture files.
pub const ERROR_PREFIX: &str = "e-";

/// One input file and every path derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// File name of the input, e.g. `prog1.pl0`
    pub name: String,
    pub input: PathBuf,
    pub output_capture: PathBuf,
    pub error_capture: PathBuf,
    pub reference_output: PathBuf,
    pub reference_error: PathBuf,
}

impl TestCase {
    pub fn new(name: &str, config: &HarnessConfig) -> Self {
        let result_name = format!("{}{}", RESULT_PREFIX, name);
        let error_name = format!("{}{}", ERROR_PREFIX, name);
        Self {
            name: name.to_string(),
            input: config.corpus_path().join(name),
            output_capture: config.results_path().join(&result_name),
            error_capture: config.errors_path().join(&error_name),
            reference_output: config.reference_results_path().join(&result_name),
            reference_error: config.reference_errors_path().join(&error_name),
        }
    }
}

/// List the entries of `dir` whose file name ends with `suffix`.
///
/// Subdirectories are neither matched nor descended into. Names come back
/// sorted so runs are reproducible across platforms.
pub fn scan_corpus(dir: &Path, suffix: &str) -> HarnessResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(HarnessError::DirectoryNotFound { path: dir.to_path_buf() });
    }

    let entries = fs::read_dir(dir).map_err(|e| HarnessError::from_io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::from_io(dir, e))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("skipping non UTF-8 file name in {}: {:?}", dir.display(), entry.file_name());
            continue;
        };
        if name.ends_with(suffix) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Scan the configured corpus and build a [`TestCase`] per matching file.
#[tracing::instrument(skip_all, fields(corpus = %config.corpus_dir.display()))]
pub fn collect_test_cases(config: &HarnessConfig) -> HarnessResult<Vec<TestCase>> {
    let names = scan_corpus(&config.corpus_path(), &config.extension)?;
    tracing::info!("collected {} test case(s)", names.len());
    Ok(names.iter().map(|name| TestCase::new(name, config)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "begin end\n").unwrap();
    }

    #[test]
    fn test_scan_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.pl0");
        touch(dir.path(), "a.pl0");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "a.pl0.bak");

        let names = scan_corpus(dir.path(), ".pl0").unwrap();
        assert_eq!(names, vec!["a.pl0", "b.pl0"]);
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.pl0")).unwrap();
        touch(&dir.path().join("nested.pl0"), "inner.pl0");
        touch(dir.path(), "top.pl0");

        let names = scan_corpus(dir.path(), ".pl0").unwrap();
        assert_eq!(names, vec!["top.pl0"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_corpus(dir.path(), ".pl0").unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = scan_corpus(&missing, ".pl0").unwrap_err();
        assert!(matches!(err, HarnessError::DirectoryNotFound { path } if path == missing));
    }

    #[test]
    fn test_scan_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "x.pl0");
        let err = scan_corpus(&dir.path().join("x.pl0"), ".pl0").unwrap_err();
        assert!(matches!(err, HarnessError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_case_paths_follow_naming_convention() {
        let config = HarnessConfig::new().with_working_dir("/work");
        let case = TestCase::new("prog1.pl0", &config);
        assert_eq!(case.input, PathBuf::from("/work/test-pgm/prog1.pl0"));
        assert_eq!(case.output_capture, PathBuf::from("/work/my-test-results/r-prog1.pl0"));
        assert_eq!(case.error_capture, PathBuf::from("/work/my-test-errors/e-prog1.pl0"));
        assert_eq!(case.reference_output, PathBuf::from("/work/test-pgm/results/r-prog1.pl0"));
        assert_eq!(case.reference_error, PathBuf::from("/work/test-pgm/errors/e-prog1.pl0"));
    }
}
