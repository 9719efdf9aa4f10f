//! Compiler invocation
//!
//! Builds the classpath and the argument vector for the compiler under test.
//! Both are computed once per run and handed to the executor explicitly; the
//! harness never writes `CLASSPATH` into its own environment.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{HarnessConfig, PathListSeparator};

/// Environment variable carrying the classpath to the child process.
pub const CLASSPATH_VAR: &str = "CLASSPATH";

/// Flag introducing the classpath argument.
pub const CLASSPATH_FLAG: &str = "-cp";

/// Absolute classpath entries plus the separator used to join them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
    separator: PathListSeparator,
}

/// Resolve each fragment under `working_dir` and keep them in the given order.
pub fn build_classpath<S: AsRef<str>>(working_dir: &Path, fragments: &[S], separator: PathListSeparator) -> Classpath {
    Classpath {
        entries: fragments.iter().map(|f| working_dir.join(f.as_ref())).collect(),
        separator,
    }
}

impl Classpath {
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn separator(&self) -> PathListSeparator {
        self.separator
    }

    /// Entries joined by the separator, as passed in an argument vector.
    pub fn joined(&self) -> String {
        let sep = self.separator.to_string();
        self.entries
            .iter()
            .map(|e| e.to_string_lossy())
            .collect::<Vec<_>>()
            .join(&sep)
    }

    /// The joined classpath wrapped in double quotes, safe to paste into a shell.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.joined())
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quoted())
    }
}

/// How the compiler is launched for one input file.
///
/// Immutable once built; one value serves the whole run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub classpath: Classpath,
    pub main_entry: String,
    pub main_args: Vec<String>,
}

impl Invocation {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            program: config.program.clone(),
            classpath: build_classpath(&config.working_dir, config.classpath.as_slice(), config.separator),
            main_entry: config.main_entry.clone(),
            main_args: config.main_args.clone(),
        }
    }

    /// Arguments for `input`: `-cp <classpath> <main> [main args..] <input>`.
    ///
    /// The classpath flag is left out when there are no entries.
    pub fn args_for(&self, input: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.main_args.len() + 4);
        if !self.classpath.is_empty() {
            args.push(OsString::from(CLASSPATH_FLAG));
            args.push(OsString::from(self.classpath.joined()));
        }
        if !self.main_entry.is_empty() {
            args.push(OsString::from(&self.main_entry));
        }
        args.extend(self.main_args.iter().map(OsString::from));
        args.push(input.as_os_str().to_os_string());
        args
    }

    /// Environment the child is spawned with.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        if self.classpath.is_empty() {
            Vec::new()
        } else {
            vec![(CLASSPATH_VAR, self.classpath.joined())]
        }
    }

    /// Human-readable command line for `input`, with the classpath quoted.
    pub fn command_line(&self, input: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        if !self.classpath.is_empty() {
            parts.push(CLASSPATH_FLAG.to_string());
            parts.push(self.classpath.quoted());
        }
        if !self.main_entry.is_empty() {
            parts.push(self.main_entry.clone());
        }
        parts.extend(self.main_args.iter().cloned());
        parts.push(input.display().to_string());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classpath_joins_in_order() {
        let cp = build_classpath(Path::new("/work"), &["bin", "java-cup-11b.jar"], PathListSeparator::Unix);
        assert_eq!(cp.joined(), "/work/bin:/work/java-cup-11b.jar");
        assert_eq!(cp.quoted(), "\"/work/bin:/work/java-cup-11b.jar\"");
        assert_eq!(cp.to_string(), cp.quoted());
    }

    #[test]
    fn test_classpath_windows_separator() {
        let cp = build_classpath(Path::new("/work"), &["bin", "lib.jar"], PathListSeparator::Windows);
        assert_eq!(cp.joined(), "/work/bin;/work/lib.jar");
    }

    #[test]
    fn test_classpath_single_fragment_has_no_separator() {
        let cp = build_classpath(Path::new("/work"), &["bin"], PathListSeparator::Unix);
        assert_eq!(cp.quoted(), "\"/work/bin\"");
    }

    #[test]
    fn test_classpath_empty() {
        let empty: [&str; 0] = [];
        let cp = build_classpath(Path::new("/work"), &empty, PathListSeparator::Unix);
        assert!(cp.is_empty());
        assert_eq!(cp.quoted(), "\"\"");
    }

    #[test]
    fn test_classpath_tolerates_spaces() {
        let cp = build_classpath(Path::new("/my work"), &["bin"], PathListSeparator::Unix);
        assert_eq!(cp.quoted(), "\"/my work/bin\"");
    }

    fn invocation(fragments: &[&str], main_args: &[&str]) -> Invocation {
        let config = HarnessConfig::new()
            .with_working_dir("/work")
            .with_classpath(fragments.iter().copied())
            .with_separator(PathListSeparator::Unix);
        let mut inv = Invocation::from_config(&config);
        inv.main_args = main_args.iter().map(|s| s.to_string()).collect();
        inv
    }

    #[test]
    fn test_args_for_input() {
        let inv = invocation(&["bin", "java-cup-11b.jar"], &["-c"]);
        let args = inv.args_for(Path::new("/work/test-pgm/prog1.pl0"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-cp",
                "/work/bin:/work/java-cup-11b.jar",
                "pl0.PL0_LALR",
                "-c",
                "/work/test-pgm/prog1.pl0"
            ]
        );
    }

    #[test]
    fn test_args_without_classpath() {
        let inv = invocation(&[], &[]);
        let args = inv.args_for(Path::new("a.pl0"));
        assert_eq!(args, vec![OsString::from("pl0.PL0_LALR"), OsString::from("a.pl0")]);
        assert!(inv.env().is_empty());
    }

    #[test]
    fn test_env_carries_classpath() {
        let inv = invocation(&["bin"], &[]);
        assert_eq!(inv.env(), vec![("CLASSPATH", "/work/bin".to_string())]);
    }

    #[test]
    fn test_default_config_yields_absolute_classpath() {
        let inv = Invocation::from_config(&HarnessConfig::default());
        assert_eq!(inv.classpath.entries().len(), 2);
        assert!(inv.classpath.entries().iter().all(|entry| entry.is_absolute()));
    }

    #[test]
    fn test_command_line_quotes_classpath() {
        let inv = invocation(&["bin"], &[]);
        assert_eq!(
            inv.command_line(Path::new("/work/test-pgm/a.pl0")),
            "java -cp \"/work/bin\" pl0.PL0_LALR /work/test-pgm/a.pl0"
        );
    }
}
