//! Harness configuration
//!
//! Defaults reproduce the layout of a PL/0 compiler assignment checkout:
//! inputs under `test-pgm/`, golden output under `test-pgm/results` and
//! `test-pgm/errors`, and a Java entry point run with the assignment's
//! classpath.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CORPUS_DIR: &str = "test-pgm";
pub const DEFAULT_EXTENSION: &str = ".pl0";
pub const DEFAULT_RESULTS_DIR: &str = "my-test-results";
pub const DEFAULT_ERRORS_DIR: &str = "my-test-errors";
pub const DEFAULT_REFERENCE_RESULTS_DIR: &str = "test-pgm/results";
pub const DEFAULT_REFERENCE_ERRORS_DIR: &str = "test-pgm/errors";
pub const DEFAULT_PROGRAM: &str = "java";
pub const DEFAULT_CLASSPATH: &[&str] = &["bin", "java-cup-11b.jar"];
pub const DEFAULT_MAIN_ENTRY: &str = "pl0.PL0_LALR";
pub const DEFAULT_STYLE_FILE: &str = "style.html";
pub const DEFAULT_REPORT_FILE: &str = "output.html";
pub const DEFAULT_SKIP_HEADER_LINES: usize = 1;

/// Separator between entries of a path list (`CLASSPATH`, `PATH`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PathListSeparator {
    /// `:`
    Unix,
    /// `;`
    Windows,
}

impl PathListSeparator {
    /// The convention of the platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            PathListSeparator::Windows
        } else {
            PathListSeparator::Unix
        }
    }

    pub fn as_char(self) -> char {
        match self {
            PathListSeparator::Unix => ':',
            PathListSeparator::Windows => ';',
        }
    }
}

impl Default for PathListSeparator {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for PathListSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Where the report preamble comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// `style.html` in the working directory when it exists, else [`StyleSource::Builtin`]
    Auto,
    /// The stylesheet shipped in `assets/style.html`
    Builtin,
    /// A user-supplied fragment, prepended verbatim
    File(PathBuf),
}

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base directory; every relative path below is resolved against it
    pub working_dir: PathBuf,
    /// Directory holding the test inputs
    pub corpus_dir: PathBuf,
    /// Required file name suffix of a test input
    pub extension: String,
    /// Captured stdout of this run (`r-<name>`)
    pub results_dir: PathBuf,
    /// Captured stderr of this run (`e-<name>`)
    pub errors_dir: PathBuf,
    /// Golden stdout captures
    pub reference_results_dir: PathBuf,
    /// Golden stderr captures
    pub reference_errors_dir: PathBuf,
    /// Executable launched once per test input
    pub program: String,
    /// Classpath fragments, relative to `working_dir`
    pub classpath: Vec<String>,
    /// Main class / entry point passed after the classpath
    pub main_entry: String,
    /// Extra arguments between the entry point and the input file
    pub main_args: Vec<String>,
    /// Path-list separator for the classpath
    pub separator: PathListSeparator,
    /// Leading banner lines dropped from both sides before diffing
    pub skip_header_lines: usize,
    /// Report preamble
    pub style: StyleSource,
    /// Report file
    pub report_path: PathBuf,
    /// Also diff stderr captures against the reference errors
    pub compare_errors: bool,
    /// Echo each captured stdout to the console
    pub echo_output: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            errors_dir: PathBuf::from(DEFAULT_ERRORS_DIR),
            reference_results_dir: PathBuf::from(DEFAULT_REFERENCE_RESULTS_DIR),
            reference_errors_dir: PathBuf::from(DEFAULT_REFERENCE_ERRORS_DIR),
            program: DEFAULT_PROGRAM.to_string(),
            classpath: DEFAULT_CLASSPATH.iter().map(|s| s.to_string()).collect(),
            main_entry: DEFAULT_MAIN_ENTRY.to_string(),
            main_args: Vec::new(),
            separator: PathListSeparator::default(),
            skip_header_lines: DEFAULT_SKIP_HEADER_LINES,
            style: StyleSource::Auto,
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
            compare_errors: false,
            echo_output: true,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Set the corpus directory and input suffix
    pub fn with_corpus(mut self, dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        self.corpus_dir = dir.into();
        self.extension = extension.into();
        self
    }

    /// Set the capture directories
    pub fn with_capture_dirs(mut self, results: impl Into<PathBuf>, errors: impl Into<PathBuf>) -> Self {
        self.results_dir = results.into();
        self.errors_dir = errors.into();
        self
    }

    /// Set the reference directories
    pub fn with_reference_dirs(mut self, results: impl Into<PathBuf>, errors: impl Into<PathBuf>) -> Self {
        self.reference_results_dir = results.into();
        self.reference_errors_dir = errors.into();
        self
    }

    /// Set the executable and its entry point
    pub fn with_program(mut self, program: impl Into<String>, main_entry: impl Into<String>) -> Self {
        self.program = program.into();
        self.main_entry = main_entry.into();
        self
    }

    /// Replace the classpath fragments
    pub fn with_classpath<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classpath = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the path-list separator
    pub fn with_separator(mut self, separator: PathListSeparator) -> Self {
        self.separator = separator;
        self
    }

    /// Set how many banner lines are ignored when comparing
    pub fn with_skip_header_lines(mut self, lines: usize) -> Self {
        self.skip_header_lines = lines;
        self
    }

    /// Set the report preamble source
    pub fn with_style(mut self, style: StyleSource) -> Self {
        self.style = style;
        self
    }

    /// Set the report file
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Resolve a configured path against the working directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.working_dir.join(path)
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.resolve(&self.corpus_dir)
    }

    pub fn results_path(&self) -> PathBuf {
        self.resolve(&self.results_dir)
    }

    pub fn errors_path(&self) -> PathBuf {
        self.resolve(&self.errors_dir)
    }

    pub fn reference_results_path(&self) -> PathBuf {
        self.resolve(&self.reference_results_dir)
    }

    pub fn reference_errors_path(&self) -> PathBuf {
        self.resolve(&self.reference_errors_dir)
    }

    pub fn report_file(&self) -> PathBuf {
        self.resolve(&self.report_path)
    }

    /// The preamble source to load, with a relative style file resolved
    /// against the working directory and [`StyleSource::Auto`] settled.
    pub fn style_source(&self) -> StyleSource {
        match &self.style {
            StyleSource::Auto => {
                let default = self.resolve(Path::new(DEFAULT_STYLE_FILE));
                if default.is_file() {
                    StyleSource::File(default)
                } else {
                    tracing::debug!(
                        "no {} in {}, using built-in style",
                        DEFAULT_STYLE_FILE,
                        self.working_dir.display()
                    );
                    StyleSource::Builtin
                }
            }
            StyleSource::File(path) => StyleSource::File(self.resolve(path)),
            StyleSource::Builtin => StyleSource::Builtin,
        }
    }
}
