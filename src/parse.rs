//! Clippings export reader.
//!
//! The export is a flat run of lines where every clipping occupies exactly
//! five: title, metadata (carrying the date), a separator, the highlight body
//! and a trailing delimiter. Groups with an empty body are bookmarks or note
//! placeholders and are dropped. A trailing partial group is ignored.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::date::parse_metadata_date;
use crate::models::ClippingRecord;

/// Lines per clipping block in the export.
pub const BLOCK_LINES: usize = 5;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Split raw export text into clipping records, in file order.
pub fn parse_clippings(raw: &str) -> Vec<ClippingRecord> {
    // Devices emit a BOM at the start of the file and often before each title.
    let lines: Vec<String> = raw
        .lines()
        .map(|line| line.replace([BYTE_ORDER_MARK, '\r'], ""))
        .collect();

    lines
        .chunks_exact(BLOCK_LINES)
        .filter_map(|block| {
            let body = &block[3];
            if body.is_empty() {
                return None;
            }
            Some(ClippingRecord {
                title: block[0].clone(),
                timestamp: parse_metadata_date(&block[1]),
                body: body.clone(),
            })
        })
        .collect()
}

/// Resolve the configured clippings input to a single file.
///
/// A directory resolves to its lexicographically first `*.txt` entry.
pub fn resolve_input(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("Clippings input does not exist: {}", path.display());
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to list clippings folder: {}", path.display()))?
    {
        let candidate = entry?.path();
        if candidate.is_file() && candidate.extension().is_some_and(|ext| ext == "txt") {
            candidates.push(candidate);
        }
    }
    candidates.sort();

    match candidates.into_iter().next() {
        Some(first) => Ok(first),
        None => bail!("No .txt clippings file found in {}", path.display()),
    }
}

/// Read and parse the clippings export at `path` (file or folder).
pub fn read_clippings(path: &Path) -> Result<Vec<ClippingRecord>> {
    let file = resolve_input(path)?;
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read clippings file: {}", file.display()))?;
    Ok(parse_clippings(&raw))
}
