//! Harness error taxonomy.
//!
//! Only conditions that abort a run are errors. A compiler that fails to
//! launch or exits non-zero is recorded as an [`ExecutionOutcome`] instead and
//! shows up as diff output in the report.
//!
//! [`ExecutionOutcome`]: crate::executor::ExecutionOutcome

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Fatal conditions raised while running the harness.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("directory not found: {}", path.display())]
    #[diagnostic(
        code(goldrun::directory_not_found),
        help("check --workdir and the corpus/reference directory options")
    )]
    DirectoryNotFound { path: PathBuf },

    #[error("file not found: {}", path.display())]
    #[diagnostic(
        code(goldrun::file_not_found),
        help("every test input needs a matching reference file (r-<name> / e-<name>)")
    )]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}", path.display())]
    #[diagnostic(code(goldrun::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HarnessError {
    /// Wrap an I/O error for `path`, mapping `NotFound` onto [`HarnessError::FileNotFound`].
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            HarnessError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HarnessError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_file_not_found() {
        let err = HarnessError::from_io(Path::new("r-x.pl0"), io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, HarnessError::FileNotFound { ref path } if path == Path::new("r-x.pl0")));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = HarnessError::from_io(
            Path::new("out"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, HarnessError::Io { .. }));
        assert_eq!(err.to_string(), "I/O error on out");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = HarnessError::DirectoryNotFound {
            path: PathBuf::from("test-pgm"),
        };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("goldrun::directory_not_found"));
        assert_eq!(err.to_string(), "directory not found: test-pgm");
    }
}
