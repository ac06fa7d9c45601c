//! Writing highlight files and the action log.
//!
//! New files contain the title, two blank lines, then the highlights separated
//! by one blank line. Appends add two line breaks and the new highlights in the
//! same layout. Line breaks are always `\r\n` regardless of platform.
//!
//! Every executed action appends one line to the log file, e.g.
//! `[2024-03-01] | New TXT File | Added 3 to: My Book`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::WriteAction;

pub const LINE_BREAK: &str = "\r\n";

/// Applies planned [`WriteAction`]s to disk.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_folder: PathBuf,
    log_file: PathBuf,
    highlight_prefix: String,
    today: NaiveDate,
}

impl Exporter {
    pub fn new(
        output_folder: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
        highlight_prefix: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            output_folder: output_folder.into(),
            log_file: log_file.into(),
            highlight_prefix: highlight_prefix.into(),
            today,
        }
    }

    /// Where a new file for `title` is written.
    pub fn new_file_path(&self, title: &str) -> PathBuf {
        self.output_folder.join(format!("{}.txt", title))
    }

    /// Execute one action. Returns the log line written, or `None` for `Skip`.
    pub fn apply(&self, action: &WriteAction) -> Result<Option<String>> {
        let (kind, count, target) = match action {
            WriteAction::Skip => return Ok(None),
            WriteAction::CreateNew { title, highlights } => {
                let path = self.new_file_path(title);
                std::fs::create_dir_all(&self.output_folder).with_context(|| {
                    format!(
                        "Failed to create output folder: {}",
                        self.output_folder.display()
                    )
                })?;
                let text = render_new_file(title, highlights, &self.highlight_prefix);
                std::fs::write(&path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                ("New TXT File", highlights.len(), path)
            }
            WriteAction::AppendTo { path, highlights } => {
                let text = render_append(highlights, &self.highlight_prefix);
                append_to(path, &text)?;
                ("Existing TXT File", highlights.len(), path.clone())
            }
        };

        let line = format!(
            "[{}] | {} | Added {} to: {}",
            self.today.format("%Y-%m-%d"),
            kind,
            count,
            display_stem(&target)
        );
        append_to(&self.log_file, &format!("{}\n", line))?;
        Ok(Some(line))
    }
}

/// Full contents of a freshly created highlight file.
pub fn render_new_file(title: &str, highlights: &[String], prefix: &str) -> String {
    format!(
        "{}{}{}",
        title,
        LINE_BREAK.repeat(3),
        join_highlights(highlights, prefix)
    )
}

/// Text appended to an existing highlight file.
pub fn render_append(highlights: &[String], prefix: &str) -> String {
    format!(
        "{}{}",
        LINE_BREAK.repeat(2),
        join_highlights(highlights, prefix)
    )
}

fn join_highlights(highlights: &[String], prefix: &str) -> String {
    highlights
        .iter()
        .map(|h| format!("{}{}", prefix, h))
        .collect::<Vec<_>>()
        .join(&LINE_BREAK.repeat(2))
}

fn append_to(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to append to {}", path.display()))?;
    Ok(())
}

fn display_stem(path: &Path) -> String {
    crate::storage::artifact_stem(path)
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
