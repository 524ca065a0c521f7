//! Canonical records and run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display layout for parsed publish dates, e.g. "March 3, 2024".
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// Which provider a record came from.
///
/// Declaration order is the fixed adapter order: keyword search results are
/// concatenated before event index results, so on a duplicate URL the keyword
/// search copy wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    KeywordSearch,
    EventIndex,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::KeywordSearch => "NewsAPI.org",
            SourceKind::EventIndex => "Event Registry",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A provider timestamp, kept verbatim alongside its parsed instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedAt {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<DateTime<Utc>>,
}

impl PublishedAt {
    pub fn new(raw: impl Into<String>, parsed: Option<DateTime<Utc>>) -> Self {
        Self {
            raw: raw.into(),
            parsed,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// "Month D, Year" when parsed, the raw provider string otherwise.
    pub fn display(&self) -> String {
        match self.parsed {
            Some(instant) => instant.format(DISPLAY_DATE_FORMAT).to_string(),
            None => self.raw.clone(),
        }
    }
}

/// One press mention in canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Publisher name or URI (may be empty)
    pub publisher: String,
    pub published_at: PublishedAt,
    pub headline: String,
    /// Identity key; empty URLs never reach a result set
    pub url: String,
    pub source: SourceKind,
}

impl ArticleRecord {
    pub fn display_date(&self) -> String {
        self.published_at.display()
    }

    /// The four-column tuple handed to renderers.
    pub fn to_row(&self) -> PickupRow {
        PickupRow {
            publisher: self.publisher.clone(),
            date: self.display_date(),
            headline: self.headline.clone(),
            url: self.url.clone(),
        }
    }
}

/// Outbound shape consumed by table, CSV, markdown and email renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupRow {
    pub publisher: String,
    pub date: String,
    pub headline: String,
    pub url: String,
}

/// Deduplicated, sorted records from one pipeline run.
///
/// Built once by the pipeline; there are no mutating accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ArticleRecord>,
}

impl ResultSet {
    pub(crate) fn new(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn rows(&self) -> Vec<PickupRow> {
        self.records.iter().map(ArticleRecord::to_row).collect()
    }

    pub fn into_vec(self) -> Vec<ArticleRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Non-fatal warning: one adapter failed and contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailed {
    pub adapter: SourceKind,
    pub message: String,
    #[serde(default)]
    pub timed_out: bool,
}

impl fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.timed_out {
            write!(f, " (timeout)")?;
        }
        Ok(())
    }
}

/// Terminal state of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "records", rename_all = "snake_case")]
pub enum RunOutcome {
    Results(ResultSet),
    /// The query legitimately matched nothing; not a failure.
    Empty,
}

/// Everything a caller needs to present one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub query: String,
    pub outcome: RunOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FetchFailed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RunReport {
    pub fn new(query: impl Into<String>, records: Vec<ArticleRecord>) -> Self {
        let outcome = if records.is_empty() {
            RunOutcome::Empty
        } else {
            RunOutcome::Results(ResultSet::new(records))
        };
        Self {
            query: query.into(),
            outcome,
            warnings: Vec::new(),
            duration_ms: None,
        }
    }

    pub fn add_warning(&mut self, warning: FetchFailed) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, RunOutcome::Empty)
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.outcome {
            RunOutcome::Results(set) => Some(set),
            RunOutcome::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            publisher: "Variety".into(),
            published_at: PublishedAt::new(
                "2024-03-05T10:00:00Z",
                Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()),
            ),
            headline: "Atlas wraps production".into(),
            url: url.into(),
            source: SourceKind::KeywordSearch,
        }
    }

    #[test]
    fn display_date_uses_month_day_year() {
        assert_eq!(record("https://a").display_date(), "March 5, 2024");
    }

    #[test]
    fn display_date_falls_back_to_raw() {
        let at = PublishedAt::new("sometime last spring", None);
        assert_eq!(at.display(), "sometime last spring");
        assert!(!at.is_parsed());
    }

    #[test]
    fn empty_report_is_distinct_from_results() {
        let report = RunReport::new("Jane Doe Atlas", Vec::new());
        assert!(report.is_empty());
        assert!(report.results().is_none());

        let report = RunReport::new("Jane Doe Atlas", vec![record("https://a")]);
        assert!(!report.is_empty());
        assert_eq!(report.results().map(ResultSet::len), Some(1));
    }

    #[test]
    fn to_row_carries_display_date() {
        let row = record("https://a").to_row();
        assert_eq!(row.date, "March 5, 2024");
        assert_eq!(row.url, "https://a");
    }

    #[test]
    fn fetch_failed_display_marks_timeouts() {
        let warning = FetchFailed {
            adapter: SourceKind::EventIndex,
            message: "Event Registry error: Timeout: after 50ms".into(),
            timed_out: true,
        };
        assert!(warning.to_string().ends_with("(timeout)"));
    }

    #[test]
    fn source_kind_order_matches_adapter_order() {
        assert!(SourceKind::KeywordSearch < SourceKind::EventIndex);
    }
}
