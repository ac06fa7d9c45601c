//! Per-book write decisions.
//!
//! The planner never touches the filesystem; it turns a reconciled book into
//! a [`WriteAction`] for the exporter and decides whether the run's watermark
//! should be written back.

use chrono::NaiveDateTime;

use crate::models::{Book, Reconciled, RunMode, WriteAction};

pub fn plan(mode: RunMode, book: &Book, reconciled: &Reconciled) -> WriteAction {
    match mode {
        RunMode::Show => WriteAction::Skip,
        RunMode::Create => create_all(book),
        RunMode::Append => match &reconciled.existing_path {
            None => create_all(book),
            Some(_) if reconciled.new_highlights.is_empty() => WriteAction::Skip,
            Some(path) => WriteAction::AppendTo {
                path: path.clone(),
                highlights: reconciled.new_highlights.clone(),
            },
        },
    }
}

fn create_all(book: &Book) -> WriteAction {
    if book.highlights.is_empty() {
        return WriteAction::Skip;
    }
    WriteAction::CreateNew {
        title: book.title.clone(),
        highlights: book.highlights.clone(),
    }
}

/// The watermark to hand to the config store, if any.
///
/// Nothing is persisted for reporting-only runs, for runs where a title
/// failed to export, or when the candidate does not move the watermark
/// forward.
pub fn watermark_to_persist(
    mode: RunMode,
    stored: Option<NaiveDateTime>,
    candidate: Option<NaiveDateTime>,
    failures: usize,
) -> Option<NaiveDateTime> {
    if mode == RunMode::Show || failures > 0 {
        return None;
    }
    let candidate = candidate?;
    match stored {
        Some(stored) if candidate <= stored => None,
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn book() -> Book {
        let mut book = Book::new("My Book");
        book.highlights = vec!["old".to_string(), "fresh".to_string()];
        book.counts.exported = 2;
        book
    }

    fn reconciled(path: Option<&str>, new: &[&str]) -> Reconciled {
        Reconciled {
            existing_path: path.map(PathBuf::from),
            new_highlights: new.iter().map(|s| s.to_string()).collect(),
            existing_count: 2 - new.len(),
            new_count: new.len(),
        }
    }

    fn at(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2021, 6, day)?.and_hms_opt(8, 30, 0)
    }

    #[test]
    fn test_append_to_existing_with_new_highlights() {
        let action = plan(
            RunMode::Append,
            &book(),
            &reconciled(Some("/shelf/My Book.txt"), &["fresh"]),
        );
        assert_eq!(
            action,
            WriteAction::AppendTo {
                path: PathBuf::from("/shelf/My Book.txt"),
                highlights: vec!["fresh".to_string()],
            }
        );
    }

    #[test]
    fn test_append_with_nothing_new_is_skip() {
        let action = plan(
            RunMode::Append,
            &book(),
            &reconciled(Some("/shelf/My Book.txt"), &[]),
        );
        assert_eq!(action, WriteAction::Skip);
    }

    #[test]
    fn test_append_without_artifact_creates_full_file() {
        let action = plan(RunMode::Append, &book(), &reconciled(None, &["old", "fresh"]));
        assert_eq!(
            action,
            WriteAction::CreateNew {
                title: "My Book".to_string(),
                highlights: vec!["old".to_string(), "fresh".to_string()],
            }
        );
    }

    #[test]
    fn test_create_ignores_reconciliation() {
        let action = plan(
            RunMode::Create,
            &book(),
            &reconciled(Some("/shelf/My Book.txt"), &[]),
        );
        assert!(matches!(action, WriteAction::CreateNew { ref highlights, .. } if highlights.len() == 2));
    }

    #[test]
    fn test_show_never_writes() {
        for r in [
            reconciled(None, &["old", "fresh"]),
            reconciled(Some("/shelf/My Book.txt"), &["fresh"]),
        ] {
            assert_eq!(plan(RunMode::Show, &book(), &r), WriteAction::Skip);
        }
    }

    #[test]
    fn test_watermark_only_moves_forward() {
        assert_eq!(watermark_to_persist(RunMode::Append, at(1), at(2), 0), at(2));
        assert_eq!(watermark_to_persist(RunMode::Append, at(2), at(2), 0), None);
        assert_eq!(watermark_to_persist(RunMode::Create, at(3), at(2), 0), None);
        assert_eq!(watermark_to_persist(RunMode::Create, None, at(2), 0), at(2));
        assert_eq!(watermark_to_persist(RunMode::Append, at(1), None, 0), None);
    }

    #[test]
    fn test_watermark_held_back_for_show_and_failures() {
        assert_eq!(watermark_to_persist(RunMode::Show, at(1), at(2), 0), None);
        assert_eq!(watermark_to_persist(RunMode::Append, at(1), at(2), 1), None);
    }
}
