//! Newest-first ordering.

use crate::types::ArticleRecord;
use std::cmp::Ordering;

/// Sorts records newest first.
///
/// Records with a parsed instant come first, by instant descending. Records
/// whose date could not be parsed follow, by raw date string descending. The
/// sort is stable, so ties keep their incoming order.
pub fn sort_chronologically(mut records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    records.sort_by(compare_newest_first);
    records
}

fn compare_newest_first(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    match (a.published_at.parsed, b.published_at.parsed) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.published_at.raw.cmp(&a.published_at.raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_timestamp;
    use crate::types::{PublishedAt, SourceKind};

    fn record(url: &str, raw_date: &str) -> ArticleRecord {
        ArticleRecord {
            publisher: String::new(),
            published_at: PublishedAt::new(raw_date, parse_timestamp(raw_date).ok()),
            headline: String::new(),
            url: url.into(),
            source: SourceKind::KeywordSearch,
        }
    }

    fn urls(records: &[ArticleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.url.as_str()).collect()
    }

    #[test]
    fn newest_first_across_formats() {
        let sorted = sort_chronologically(vec![
            record("old", "2024-03-01"),
            record("new", "2024-03-05T10:00:00Z"),
            record("mid", "March 3, 2024"),
        ]);
        assert_eq!(urls(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn parsed_is_non_increasing() {
        let sorted = sort_chronologically(vec![
            record("a", "2024-01-02"),
            record("b", "2024-06-10T08:00:00Z"),
            record("c", "2023-12-31"),
            record("d", "2024-06-10"),
        ]);
        let instants: Vec<_> = sorted.iter().filter_map(|r| r.published_at.parsed).collect();
        assert!(instants.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn unparsed_dates_sort_after_parsed() {
        let sorted = sort_chronologically(vec![
            record("raw-a", "alpha"),
            record("parsed", "2020-01-01"),
            record("raw-z", "zulu"),
        ]);
        assert_eq!(urls(&sorted), vec!["parsed", "raw-z", "raw-a"]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let sorted = sort_chronologically(vec![
            record("first", "2024-03-01"),
            record("second", "2024-03-01"),
            record("third", "2024-03-01"),
        ]);
        assert_eq!(urls(&sorted), vec!["first", "second", "third"]);
    }
}
