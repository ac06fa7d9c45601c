//! Run orchestration.
//!
//! Coordinates one invocation: read export → aggregate (with optional
//! watermark filter) → reconcile each book against the storage root → plan
//! and apply writes → persist the watermark. Failures are per title: a book
//! that cannot be read or written is reported and the run moves on, but the
//! watermark is then left untouched so the next filtered run retries it.

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::config::{self, Config};
use crate::export::Exporter;
use crate::models::{Library, RunMode};
use crate::parse::read_clippings;
use crate::plan::{plan, watermark_to_persist};
use crate::reconcile::{classify, reconcile};
use crate::report::{render_table, render_watermark};
use crate::storage::StorageIndex;

/// What happened during one run.
#[derive(Debug)]
pub struct RunOutcome {
    pub library: Library,
    /// Action-log lines for every write that succeeded, in order.
    pub log_lines: Vec<String>,
    /// `(title, error)` for every book that could not be processed.
    pub failures: Vec<(String, String)>,
    /// Latest timestamp among processed clippings (or the old watermark).
    pub watermark: Option<NaiveDateTime>,
    pub watermark_stored: bool,
}

/// Execute a run against `config` and persist the watermark to `config_path`.
pub fn execute(
    config_path: &Path,
    config: &mut Config,
    mode: RunMode,
    filter_by_date: bool,
    today: NaiveDate,
) -> Result<RunOutcome> {
    let records = read_clippings(&config.clippings_path())?;
    let total_records = records.len();

    let stored_watermark = config.watermark();
    let aggregation = aggregate(records, stored_watermark, filter_by_date);
    let mut library = aggregation.library;
    info!(
        records = total_records,
        books = library.len(),
        mode = mode.as_str(),
        filter_by_date,
        "clippings aggregated"
    );

    let index = StorageIndex::scan(&config.storage_root())?;
    let exporter = Exporter::new(
        config.output_folder(),
        config.log_file(),
        config.export.highlight_prefix.clone(),
        today,
    );

    let mut log_lines = Vec::new();
    let mut failures = Vec::new();

    for book in library.iter_mut() {
        let reconciled = match reconcile(book, &index) {
            // create writes every highlight anyway; the stored file only feeds the counts
            Err(e) if mode == RunMode::Create => {
                warn!(
                    title = %book.title,
                    error = %format!("{:#}", e),
                    "stored file unreadable; counting every highlight as new"
                );
                Ok(classify(book, None, ""))
            }
            other => other,
        };
        let result = reconciled.and_then(|reconciled| {
            let action = plan(mode, book, &reconciled);
            exporter.apply(&action)
        });
        match result {
            Ok(Some(line)) => log_lines.push(line),
            Ok(None) => {}
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(title = %book.title, error = %error, "export failed");
                failures.push((book.title.clone(), error));
            }
        }
    }

    let mut watermark_stored = false;
    if let Some(candidate) =
        watermark_to_persist(mode, stored_watermark, aggregation.watermark, failures.len())
    {
        watermark_stored = config::store_watermark(config_path, config, candidate)?;
    }

    Ok(RunOutcome {
        library,
        log_lines,
        failures,
        watermark: aggregation.watermark,
        watermark_stored,
    })
}

/// CLI entry point for `append`, `create` and `show`.
pub fn run(config_path: &Path, config: &mut Config, mode: RunMode, filter_by_date: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let outcome = execute(config_path, config, mode, filter_by_date, today)?;

    for line in &outcome.log_lines {
        println!("{}", line);
    }
    if !outcome.log_lines.is_empty() {
        println!();
    }

    print!("{}", render_table(mode, &outcome.library));
    println!();
    println!("{}", render_watermark(outcome.watermark));
    if outcome.watermark_stored {
        if let Some(ts) = outcome.watermark {
            println!("  New date stored in config: {}", ts.format("%Y-%m-%d %H:%M:%S"));
        }
    }

    if !outcome.failures.is_empty() {
        eprintln!();
        for (title, error) in &outcome.failures {
            eprintln!("  failed: {}: {}", title, error);
        }
        bail!(
            "{} of {} titles failed to export; watermark not updated",
            outcome.failures.len(),
            outcome.library.len()
        );
    }

    Ok(())
}
