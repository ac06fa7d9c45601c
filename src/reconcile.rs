//! Classification of a book's highlights against its stored artifact.
//!
//! A highlight counts as already exported when its text occurs anywhere in
//! the stored file as a raw substring. Stored files may have been edited or
//! reformatted by hand, so exact line matching would re-append highlights
//! that are already there. The flip side is that a short highlight contained
//! in a longer, unrelated stored passage is also treated as present.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use crate::models::{Book, Reconciled};
use crate::storage::StorageIndex;

/// Locate the stored artifact for `book`, read it once and split the book's
/// highlights into existing and new. Updates `book.counts` in place.
pub fn reconcile(book: &mut Book, index: &StorageIndex) -> Result<Reconciled> {
    let Some(path) = index.lookup(&book.title) else {
        return Ok(classify(book, None, ""));
    };

    let stored = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stored highlights: {}", path.display()))?;

    Ok(classify(book, Some(path.to_path_buf()), &stored))
}

/// Split highlights by containment in `stored`. With no artifact every
/// highlight is new.
pub fn classify(book: &mut Book, existing_path: Option<PathBuf>, stored: &str) -> Reconciled {
    let new_highlights: Vec<String> = match existing_path {
        Some(_) => book
            .highlights
            .iter()
            .filter(|h| !stored.contains(h.as_str()))
            .cloned()
            .collect(),
        None => book.highlights.clone(),
    };

    let new_count = new_highlights.len();
    let existing_count = book.highlights.len() - new_count;
    book.counts.new = new_count;
    book.counts.existing = existing_count;

    debug!(
        title = %book.title,
        existing = existing_count,
        new = new_count,
        "reconciled"
    );

    Reconciled {
        existing_path,
        new_highlights,
        existing_count,
        new_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn book(title: &str, highlights: &[&str]) -> Book {
        let mut book = Book::new(title);
        book.highlights = highlights.iter().map(|h| h.to_string()).collect();
        book.counts.exported = highlights.len();
        book
    }

    #[test]
    fn test_no_artifact_means_all_new() {
        let mut b = book("My Book", &["A nice quote.", "Another."]);
        let result = reconcile(&mut b, &StorageIndex::default()).unwrap();

        assert_eq!(result.existing_path, None);
        assert_eq!(result.new_highlights, vec!["A nice quote.", "Another."]);
        assert_eq!((result.existing_count, result.new_count), (0, 2));
        assert_eq!(b.counts.new, 2);
        assert_eq!(b.counts.existing, 0);
        assert_eq!(b.counts.exported, 2);
    }

    #[test]
    fn test_existing_artifact_with_verbatim_quote() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("My Book.txt");
        fs::write(&path, "My Book\r\n\r\n\r\nA nice quote.").unwrap();
        let index = StorageIndex::scan(tmp.path()).unwrap();

        let mut b = book("My Book", &["A nice quote."]);
        let result = reconcile(&mut b, &index).unwrap();

        assert_eq!(result.existing_path, Some(path));
        assert!(result.new_highlights.is_empty());
        assert_eq!(b.counts.existing, 1);
        assert_eq!(b.counts.new, 0);
    }

    #[test]
    fn test_mixed_classification_preserves_order() {
        let stored = "Title\n\n  first  \n\nthird, edited by hand later";
        let mut b = book("Title", &["first", "second", "third", "fourth"]);
        let result = classify(&mut b, Some(PathBuf::from("Title.txt")), stored);

        assert_eq!(result.new_highlights, vec!["second", "fourth"]);
        assert_eq!((b.counts.existing, b.counts.new), (2, 2));
    }

    #[test]
    fn test_substring_of_unrelated_passage_counts_as_existing() {
        let stored = "The whole is more than the sum of its parts.";
        let mut b = book("T", &["the sum"]);
        let result = classify(&mut b, Some(PathBuf::from("T.txt")), stored);
        assert!(result.new_highlights.is_empty());
        assert_eq!(result.existing_count, 1);
    }

    #[test]
    fn test_unreadable_artifact_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Bin.txt"), [0xff, 0xfe, 0xfd]).unwrap();
        let index = StorageIndex::scan(tmp.path()).unwrap();

        let mut b = book("Bin", &["x"]);
        assert!(reconcile(&mut b, &index).is_err());
    }
}
