//! Console overview of a run.
//!
//! Renders one row per book with its highlight counts. `append` and `show`
//! runs include the existing/new split; `create` runs only show totals since
//! reconciliation does not influence what gets written.

use chrono::NaiveDateTime;

use crate::models::{Library, RunMode};

const MIN_TITLE_WIDTH: usize = 5;

pub fn render_table(mode: RunMode, library: &Library) -> String {
    let width = library
        .iter()
        .map(|b| b.title.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_TITLE_WIDTH);
    let split = matches!(mode, RunMode::Append | RunMode::Show);

    let mut out = String::new();
    out.push_str("Kindle Clippings\n");
    out.push_str("================\n\n");

    let header = if split {
        format!(
            "  {:<width$} {:>8} {:>6} {:>6}",
            "TITLE",
            "EXISTING",
            "NEW",
            "TOTAL",
            width = width
        )
    } else {
        format!("  {:<width$} {:>6}", "TITLE", "TOTAL", width = width)
    };
    let rule_len = header.chars().count() - 2;
    out.push_str(&header);
    out.push('\n');
    out.push_str(&format!("  {}\n", "-".repeat(rule_len)));

    for book in library.iter() {
        let row = if split {
            format!(
                "  {:<width$} {:>8} {:>6} {:>6}",
                book.title,
                book.counts.existing,
                book.counts.new,
                book.counts.exported,
                width = width
            )
        } else {
            format!(
                "  {:<width$} {:>6}",
                book.title,
                book.counts.exported,
                width = width
            )
        };
        out.push_str(&row);
        out.push('\n');
    }

    if library.is_empty() {
        out.push_str("  (no clippings to export)\n");
    }

    out
}

/// One-line summary of the watermark after a run.
pub fn render_watermark(watermark: Option<NaiveDateTime>) -> String {
    match watermark {
        Some(ts) => format!("  Latest clipping: {}", ts.format("%Y-%m-%d %H:%M:%S")),
        None => "  Latest clipping: unknown".to_string(),
    }
}
