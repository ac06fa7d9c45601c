//! Index of previously exported artifacts.
//!
//! The storage root is walked once at startup and every `*.txt` file is
//! recorded. The index is an immutable snapshot for the rest of the run;
//! files written during the run do not show up in it.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const ARTIFACT_EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Default)]
pub struct StorageIndex {
    /// Sorted by full path, which makes duplicate-stem resolution deterministic.
    files: Vec<PathBuf>,
}

impl StorageIndex {
    /// Walk `root` recursively and collect every artifact file.
    ///
    /// A missing root yields an empty index: every title will be treated as new.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.exists() {
            warn!(
                root = %root.display(),
                "storage root does not exist; treating every title as new"
            );
            return Ok(Self::default());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry?;
            if entry.file_type().is_file() && artifact_stem(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }

        Ok(Self::from_paths(files))
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut files: Vec<PathBuf> = paths.into_iter().collect();
        files.sort();
        Self { files }
    }

    /// Find the artifact whose stem equals `title`.
    ///
    /// When several files share the stem the lexicographically first path wins
    /// and the rest are reported.
    pub fn lookup(&self, title: &str) -> Option<&Path> {
        let mut matches = self
            .files
            .iter()
            .filter(|path| artifact_stem(path) == Some(title));

        let first = matches.next()?;
        let others: Vec<String> = matches.map(|p| p.display().to_string()).collect();
        if !others.is_empty() {
            warn!(
                title,
                chosen = %first.display(),
                ignored = ?others,
                "several stored files share this title"
            );
        }
        Some(first.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// File name without the `.txt` suffix; `None` for anything else.
pub fn artifact_stem(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.strip_suffix(ARTIFACT_EXTENSION)
}
