//! Grouping of parsed clippings into per-title books.
//!
//! This is the only place where the watermark filter is applied. With
//! filtering on, a clipping is kept only when its timestamp is known and
//! strictly later than the stored watermark. Either way the returned
//! watermark is the maximum of the old one and every known timestamp that
//! made it into a book, so it never moves backwards.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::{ClippingRecord, Library};
use crate::title::normalize_title;

/// Books for one run plus the watermark to persist afterwards.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub library: Library,
    pub watermark: Option<NaiveDateTime>,
}

pub fn aggregate<I>(records: I, watermark: Option<NaiveDateTime>, filter_by_date: bool) -> Aggregation
where
    I: IntoIterator<Item = ClippingRecord>,
{
    let mut library = Library::new();
    let mut latest = watermark;
    let mut skipped = 0usize;

    for record in records {
        if filter_by_date && !is_after(record.timestamp, watermark) {
            skipped += 1;
            continue;
        }

        if let Some(ts) = record.timestamp {
            if latest.map_or(true, |l| ts > l) {
                latest = Some(ts);
            }
        }

        let book = library.entry(&normalize_title(&record.title));
        book.highlights.push(record.body);
        book.counts.exported += 1;
    }

    if skipped > 0 {
        debug!(skipped, "clippings at or before the watermark were skipped");
    }

    Aggregation {
        library,
        watermark: latest,
    }
}

/// `Unknown` never compares later than anything; any known time beats no watermark.
fn is_after(ts: Option<NaiveDateTime>, watermark: Option<NaiveDateTime>) -> bool {
    match (ts, watermark) {
        (Some(ts), Some(mark)) => ts > mark,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
