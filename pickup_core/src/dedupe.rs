//! URL-keyed deduplication.

use crate::types::ArticleRecord;
use std::collections::HashSet;

/// Keeps the first record seen for each URL, preserving input order.
///
/// Records with an empty URL are dropped. Callers rely on the first-seen rule:
/// keyword search results are concatenated ahead of event index results, so
/// the keyword search copy of a shared URL is the one kept.
pub fn dedupe(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let before = records.len();

    let kept: Vec<ArticleRecord> = records
        .into_iter()
        .filter(|record| !record.url.is_empty() && seen.insert(record.url.clone()))
        .collect();

    tracing::debug!(before, after = kept.len(), "deduplicated records");
    kept
}
