//! Core data models used throughout the clipping pipeline.
//!
//! These types represent the parsed clippings, the per-title books they are
//! grouped into, and the write actions planned for each book.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::PathBuf;

/// One highlight block parsed from the raw export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClippingRecord {
    /// Title line exactly as exported, before normalization.
    pub title: String,
    /// `None` when the metadata line carried no recognizable date.
    pub timestamp: Option<NaiveDateTime>,
    pub body: String,
}

/// Per-book highlight tallies used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Highlights already present in a stored artifact.
    pub existing: usize,
    /// Highlights not found in any stored artifact.
    pub new: usize,
    /// Highlights included by aggregation in this run.
    pub exported: usize,
}

/// All highlights for a single normalized title within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub highlights: Vec<String>,
    pub counts: Counts,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            highlights: Vec::new(),
            counts: Counts::default(),
        }
    }
}

/// Books keyed by title, iterated in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Library {
    books: Vec<Book>,
    index: HashMap<String, usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the book for `title`, creating an empty one on first use.
    pub fn entry(&mut self, title: &str) -> &mut Book {
        let idx = match self.index.get(title) {
            Some(&idx) => idx,
            None => {
                self.books.push(Book::new(title));
                let idx = self.books.len() - 1;
                self.index.insert(title.to_string(), idx);
                idx
            }
        };
        &mut self.books[idx]
    }

    pub fn get(&self, title: &str) -> Option<&Book> {
        self.index.get(title).map(|&idx| &self.books[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Book> {
        self.books.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// How a run treats previously exported artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Append only unseen highlights to existing files; create files for new titles.
    Append,
    /// Write a fresh file for every title, overwriting same-named output.
    Create,
    /// Report counts without touching the filesystem.
    Show,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Append => "append",
            RunMode::Create => "create",
            RunMode::Show => "show",
        }
    }
}

/// The outcome of reconciling one book against the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub existing_path: Option<PathBuf>,
    pub new_highlights: Vec<String>,
    pub existing_count: usize,
    pub new_count: usize,
}

/// A single filesystem change the planner asks the exporter to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction {
    AppendTo {
        path: PathBuf,
        highlights: Vec<String>,
    },
    CreateNew {
        title: String,
        highlights: Vec<String>,
    },
    /// Nothing to write for this book.
    Skip,
}
