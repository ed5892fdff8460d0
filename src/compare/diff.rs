//! Human-readable differences between two row collections.

use super::value::ComparableRow;
use similar::TextDiff;
use std::fmt::Write;

fn render_row(row: &ComparableRow) -> String {
    let mut line = String::from("{");
    for (i, (column, value)) in row.iter().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        let _ = write!(line, "{}: {}", column, value);
    }
    line.push_str("}\n");
    line
}

fn render_rows(rows: &[ComparableRow]) -> String {
    rows.iter().map(render_row).collect()
}

/// Compare `want` with `got` row by row.
///
/// Returns `None` when both collections are equal, otherwise a unified diff
/// with one line per row. Equality is decided on the typed values; the text
/// rendering only serves the report.
pub fn diff_rows(want: &[ComparableRow], got: &[ComparableRow]) -> Option<String> {
    if want == got {
        return None;
    }

    let want_text = render_rows(want);
    let got_text = render_rows(got);

    let mut report = String::new();
    if want.len() != got.len() {
        let _ = writeln!(report, "row count: want {}, got {}", want.len(), got.len());
    }

    if want_text == got_text {
        // Values differ below the rendering precision
        for (i, (w, g)) in want.iter().zip(got).enumerate() {
            if w != g {
                let _ = writeln!(report, "row {}: values differ", i + 1);
            }
        }
    } else {
        let diff = TextDiff::from_lines(&want_text, &got_text);
        let _ = write!(report, "{}", diff.unified_diff().header("want", "got"));
    }

    Some(report)
}
