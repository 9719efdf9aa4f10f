//! HTML report generation
//!
//! Each test case contributes one side-by-side diff table comparing its
//! capture with the reference capture. The report is the style preamble, the
//! tables in corpus order, and a closing tag.

use std::fs;
use std::path::{Path, PathBuf};

use goldrun_diff::{DiffTable, render_table};

use crate::config::{DEFAULT_STYLE_FILE, StyleSource};
use crate::error::{HarnessError, HarnessResult};

/// Built-in preamble used when no style file is supplied.
pub const BUILTIN_STYLE: &str = include_str!("../assets/style.html");

/// Closes the document opened by the preamble.
pub const CLOSING_TAG: &str = "</body></html>";

/// Read `path` as a sequence of lines.
///
/// Invalid UTF-8 is replaced rather than rejected; an empty file yields no
/// lines. Line terminators are dropped, so `\n` vs `\r\n` and a missing
/// final newline never show up as differences.
pub fn read_lines(path: &Path) -> HarnessResult<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| HarnessError::from_io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect())
}

/// Diff a candidate capture against its reference.
///
/// The first `skip_header_lines` lines of each file are ignored. Both files
/// must exist; a missing one is reported as [`HarnessError::FileNotFound`].
pub fn compare_files(candidate: &Path, reference: &Path, skip_header_lines: usize) -> HarnessResult<DiffTable> {
    let candidate_lines = read_lines(candidate)?;
    let reference_lines = read_lines(reference)?;

    let from = candidate_lines.get(skip_header_lines..).unwrap_or_default();
    let to = reference_lines.get(skip_header_lines..).unwrap_or_default();

    let table = render_table(
        from,
        to,
        &candidate.display().to_string(),
        &reference.display().to_string(),
    );
    tracing::debug!(
        candidate = %candidate.display(),
        changed_rows = table.changed_rows(),
        "compared capture"
    );
    Ok(table)
}

/// Load the report preamble.
///
/// [`StyleSource::Auto`] looks for `style.html` in the process's current
/// directory; use [`crate::HarnessConfig::style_source`] to settle it against a
/// working directory first.
pub fn load_preamble(style: &StyleSource) -> HarnessResult<String> {
    match style {
        StyleSource::Auto => {
            let default = Path::new(DEFAULT_STYLE_FILE);
            if default.is_file() {
                load_preamble(&StyleSource::File(default.to_path_buf()))
            } else {
                Ok(BUILTIN_STYLE.to_string())
            }
        }
        StyleSource::Builtin => Ok(BUILTIN_STYLE.to_string()),
        StyleSource::File(path) => fs::read_to_string(path).map_err(|e| HarnessError::from_io(path, e)),
    }
}

/// A diff table with the name of the test it belongs to.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub name: String,
    pub table: DiffTable,
}

/// Ordered collection of diff tables, serialized once at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    entries: Vec<ReportEntry>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, table: DiffTable) {
        self.entries.push(ReportEntry {
            name: name.into(),
            table,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preamble, every table in insertion order, then [`CLOSING_TAG`].
    pub fn render(&self, preamble: &str) -> String {
        let tables: Vec<&str> = self.entries.iter().map(|e| e.table.html()).collect();
        let mut html = String::with_capacity(preamble.len() + tables.iter().map(|t| t.len() + 1).sum::<usize>() + 16);
        html.push_str(preamble);
        html.push_str(&tables.join("\n"));
        html.push_str(CLOSING_TAG);
        html
    }

    /// Write the rendered report to `path`, replacing any previous file.
    ///
    /// The document goes to a sibling temporary file first and is renamed
    /// into place, so `path` is either the old report or the complete new one.
    pub fn write_to(&self, path: &Path, preamble: &str) -> HarnessResult<()> {
        let html = self.render(preamble);
        let tmp = temp_sibling(path);
        fs::write(&tmp, html).map_err(|e| HarnessError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            HarnessError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        tracing::info!("wrote {} diff table(s) to {}", self.len(), path.display());
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
