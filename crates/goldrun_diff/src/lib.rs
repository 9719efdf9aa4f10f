//! Side-by-side HTML rendering of a line diff.
//!
//! Two ordered sequences of lines are aligned with a Myers line diff and
//! rendered as a single `<table class="diff">`. The markup uses the
//! conventional report class names so an external stylesheet can colour it:
//!
//! - `diff_header` - line-number cells and the column captions
//! - `diff_chg` - the changed characters inside a paired (replaced) line
//! - `diff_add` - a line present only on the right-hand side
//! - `diff_sub` - a line present only on the left-hand side
//!
//! Rows that are equal on both sides carry no marker at all, so a table with
//! no changes contains none of the three marker classes.
//!
//! This crate performs no I/O; callers read the files and decide which lines
//! to compare.

use similar::{Algorithm, ChangeTag, DiffOp, TextDiff};

/// Marker class for changed characters inside a replaced line.
pub const CLASS_CHANGED: &str = "diff_chg";
/// Marker class for right-only lines.
pub const CLASS_ADDED: &str = "diff_add";
/// Marker class for left-only lines.
pub const CLASS_REMOVED: &str = "diff_sub";

/// Number of `&nbsp;` emitted for a tab character.
const TAB_WIDTH: usize = 8;

/// How a rendered row relates the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Equal,
    Changed,
    Added,
    Removed,
}

impl RowKind {
    pub fn is_change(self) -> bool {
        !matches!(self, RowKind::Equal)
    }
}

/// A rendered diff table plus the row classification it was built from.
#[derive(Debug, Clone)]
pub struct DiffTable {
    html: String,
    rows: Vec<RowKind>,
}

impl DiffTable {
    /// The `<table>` fragment.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Row kinds in display order.
    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    /// Number of rows carrying a change marker.
    pub fn changed_rows(&self) -> usize {
        self.rows.iter().filter(|k| k.is_change()).count()
    }

    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(|k| k.is_change())
    }
}

/// Diff `from` against `to` and render the result as an HTML table.
///
/// `from_desc` and `to_desc` label the two columns (usually file paths) and
/// are escaped like any other text.
pub fn render_table<S: AsRef<str>>(from: &[S], to: &[S], from_desc: &str, to_desc: &str) -> DiffTable {
    let old: Vec<&str> = from.iter().map(AsRef::as_ref).collect();
    let new: Vec<&str> = to.iter().map(AsRef::as_ref).collect();

    let mut table = TableWriter::new(from_desc, to_desc);

    for op in similar::capture_diff_slices(Algorithm::Myers, &old, &new) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                for i in 0..len {
                    table.row(
                        RowKind::Equal,
                        Some((old_index + i, escape_html(old[old_index + i]))),
                        Some((new_index + i, escape_html(new[new_index + i]))),
                    );
                }
            }
            DiffOp::Delete { old_index, old_len, .. } => {
                for i in old_index..old_index + old_len {
                    table.row(RowKind::Removed, Some((i, whole_line(CLASS_REMOVED, old[i]))), None);
                }
            }
            DiffOp::Insert { new_index, new_len, .. } => {
                for i in new_index..new_index + new_len {
                    table.row(RowKind::Added, None, Some((i, whole_line(CLASS_ADDED, new[i]))));
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                for i in 0..old_len.max(new_len) {
                    let left = (i < old_len).then_some(old_index + i);
                    let right = (i < new_len).then_some(new_index + i);
                    match (left, right) {
                        (Some(l), Some(r)) => {
                            let (left_html, right_html) = intraline(old[l], new[r]);
                            table.row(RowKind::Changed, Some((l, left_html)), Some((r, right_html)));
                        }
                        (Some(l), None) => {
                            table.row(RowKind::Removed, Some((l, whole_line(CLASS_REMOVED, old[l]))), None);
                        }
                        (None, Some(r)) => {
                            table.row(RowKind::Added, None, Some((r, whole_line(CLASS_ADDED, new[r]))));
                        }
                        (None, None) => {}
                    }
                }
            }
        }
    }

    table.finish()
}

/// Escape text for an HTML table cell.
///
/// Spaces become `&nbsp;` so column alignment inside a line survives.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            ' ' => out.push_str("&nbsp;"),
            '\t' => {
                for _ in 0..TAB_WIDTH {
                    out.push_str("&nbsp;");
                }
            }
            other => out.push(other),
        }
    }
}

fn whole_line(class: &str, text: &str) -> String {
    format!("<span class=\"{}\">{}</span>", class, escape_html(text))
}

/// Character-level markup for a pair of lines that replace each other.
fn intraline(old: &str, new: &str) -> (String, String) {
    let diff = TextDiff::from_chars(old, new);
    let mut left = MarkedText::default();
    let mut right = MarkedText::default();

    for change in diff.iter_all_changes() {
        let text = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                left.push(text, false);
                right.push(text, false);
            }
            ChangeTag::Delete => left.push(text, true),
            ChangeTag::Insert => right.push(text, true),
        }
    }

    (left.finish(), right.finish())
}

/// Escaped text with `diff_chg` spans opened and closed on run boundaries.
#[derive(Default)]
struct MarkedText {
    html: String,
    open: bool,
}

impl MarkedText {
    fn push(&mut self, text: &str, changed: bool) {
        if changed != self.open {
            if changed {
                self.html.push_str(&format!("<span class=\"{}\">", CLASS_CHANGED));
            } else {
                self.html.push_str("</span>");
            }
            self.open = changed;
        }
        escape_into(&mut self.html, text);
    }

    fn finish(mut self) -> String {
        if self.open {
            self.html.push_str("</span>");
        }
        self.html
    }
}

struct TableWriter {
    html: String,
    rows: Vec<RowKind>,
}

impl TableWriter {
    fn new(from_desc: &str, to_desc: &str) -> Self {
        let mut html = String::new();
        html.push_str("<table class=\"diff\" cellspacing=\"0\" cellpadding=\"0\" rules=\"groups\">\n");
        html.push_str("<colgroup></colgroup> <colgroup></colgroup> <colgroup></colgroup> <colgroup></colgroup>\n");
        html.push_str(&format!(
            "<thead><tr><th colspan=\"2\" class=\"diff_header\">{}</th><th colspan=\"2\" class=\"diff_header\">{}</th></tr></thead>\n",
            escape_html(from_desc),
            escape_html(to_desc)
        ));
        html.push_str("<tbody>\n");
        Self { html, rows: Vec::new() }
    }

    fn row(&mut self, kind: RowKind, left: Option<(usize, String)>, right: Option<(usize, String)>) {
        self.html.push_str("<tr>");
        self.cell(left);
        self.cell(right);
        self.html.push_str("</tr>\n");
        self.rows.push(kind);
    }

    fn cell(&mut self, side: Option<(usize, String)>) {
        match side {
            Some((index, text)) => self.html.push_str(&format!(
                "<td class=\"diff_header\">{}</td><td nowrap=\"nowrap\">{}</td>",
                index + 1,
                text
            )),
            None => self
                .html
                .push_str("<td class=\"diff_header\"></td><td nowrap=\"nowrap\"></td>"),
        }
    }

    fn finish(mut self) -> DiffTable {
        self.html.push_str("</tbody>\n</table>");
        DiffTable {
            html: self.html,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_marker(html: &str) -> bool {
        [CLASS_CHANGED, CLASS_ADDED, CLASS_REMOVED]
            .iter()
            .any(|class| html.contains(class))
    }

    // ========================================
    // escape_html tests
    // ========================================

    #[test]
    fn test_escape_html_special_characters() {
        insta::assert_snapshot!(escape_html("if a<b && c>\"d\""), @"if&nbsp;a&lt;b&nbsp;&amp;&amp;&nbsp;c&gt;&quot;d&quot;");
    }

    #[test]
    fn test_escape_html_tab_expands() {
        assert_eq!(escape_html("\tx"), format!("{}x", "&nbsp;".repeat(TAB_WIDTH)));
    }

    #[test]
    fn test_escape_html_plain_text_untouched() {
        assert_eq!(escape_html("LOAD_CONST"), "LOAD_CONST");
    }

    // ========================================
    // render_table tests
    // ========================================

    #[test]
    fn test_identical_lines_have_no_markers() {
        let lines = ["Compiling prog1.pl0", "Parsing complete", "Running ..."];
        let table = render_table(&lines, &lines, "mine", "theirs");
        assert!(!table.has_changes());
        assert_eq!(table.changed_rows(), 0);
        assert_eq!(table.rows().len(), 3);
        assert!(!has_marker(table.html()));
    }

    #[test]
    fn test_empty_inputs_render_empty_body() {
        let empty: [&str; 0] = [];
        let table = render_table(&empty, &empty, "a", "b");
        assert!(table.rows().is_empty());
        assert!(table.html().starts_with("<table class=\"diff\""));
        assert!(table.html().ends_with("</table>"));
    }

    #[test]
    fn test_descriptions_are_escaped() {
        let table = render_table(&["x"], &["x"], "a<b>", "c&d");
        assert!(table.html().contains("a&lt;b&gt;"));
        assert!(table.html().contains("c&amp;d"));
    }

    #[test]
    fn test_replaced_line_marks_changed_characters() {
        let table = render_table(&["x"], &["y"], "old", "new");
        assert_eq!(table.rows(), &[RowKind::Changed]);
        insta::assert_snapshot!(
            table.html().lines().nth(4).unwrap(),
            @r#"<tr><td class="diff_header">1</td><td nowrap="nowrap"><span class="diff_chg">x</span></td><td class="diff_header">1</td><td nowrap="nowrap"><span class="diff_chg">y</span></td></tr>"#
        );
    }

    #[test]
    fn test_intraline_keeps_common_prefix_unmarked() {
        let (left, right) = intraline("LOAD 1", "LOAD 2");
        assert_eq!(left, "LOAD&nbsp;<span class=\"diff_chg\">1</span>");
        assert_eq!(right, "LOAD&nbsp;<span class=\"diff_chg\">2</span>");
    }

    #[test]
    fn test_inserted_line_marked_added() {
        let table = render_table(&["a", "c"], &["a", "b", "c"], "old", "new");
        assert_eq!(table.rows(), &[RowKind::Equal, RowKind::Added, RowKind::Equal]);
        assert!(table.html().contains("<span class=\"diff_add\">b</span>"));
        assert!(!table.html().contains(CLASS_REMOVED));
    }

    #[test]
    fn test_deleted_line_marked_removed() {
        let table = render_table(&["a", "b", "c"], &["a", "c"], "old", "new");
        assert_eq!(table.rows(), &[RowKind::Equal, RowKind::Removed, RowKind::Equal]);
        assert!(table.html().contains("<span class=\"diff_sub\">b</span>"));
        assert_eq!(table.changed_rows(), 1);
    }

    #[test]
    fn test_uneven_replacement_pairs_then_adds() {
        let table = render_table(&["a", "x"], &["a", "y", "z"], "old", "new");
        assert_eq!(table.rows(), &[RowKind::Equal, RowKind::Changed, RowKind::Added]);
    }

    #[test]
    fn test_one_sided_diff_against_empty() {
        let empty: [&str; 0] = [];
        let table = render_table(&empty, &["OK", "DONE"], "old", "new");
        assert_eq!(table.changed_rows(), 2);
        assert!(table.rows().iter().all(|k| *k == RowKind::Added));
    }
}
