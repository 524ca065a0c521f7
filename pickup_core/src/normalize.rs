//! Provider records to canonical [`ArticleRecord`]s.

use crate::adapters::{EventRegistryArticle, NewsApiArticle, RawArticle};
use crate::error::DateParseFailure;
use crate::types::{ArticleRecord, PublishedAt, SourceKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Offset-bearing layouts not covered by RFC 3339 / RFC 2822.
static ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Layouts without an offset; read as UTC.
static NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Calendar dates; read as midnight UTC. Free-form inputs are cleaned of
/// commas and ordinal suffixes before these are tried.
static DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d %Y",
    "%d %B %Y",
    "%A %B %d %Y",
    "%A %d %B %Y",
    "%m/%d/%Y",
];

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal pattern is valid")
});

/// Parse a provider timestamp into an absolute instant.
///
/// Accepts ISO 8601 / RFC 3339 date-times, RFC 2822, bare calendar dates and
/// free-form dates such as "March 3, 2024" or "3rd March 2024".
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DateParseFailure> {
    let fail = || DateParseFailure {
        raw: raw.to_string(),
    };

    let s = raw.trim();
    if s.is_empty() {
        return Err(fail());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    let cleaned = clean_free_form(s);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(fail)?;
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(fail())
}

/// "Sunday, March 3rd, 2024" -> "Sunday March 3 2024"
fn clean_free_form(s: &str) -> String {
    let without_ordinals = ORDINAL_RE.replace_all(s, "$1");
    without_ordinals
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn published_at(raw: String) -> PublishedAt {
    match parse_timestamp(&raw) {
        Ok(instant) => PublishedAt::new(raw, Some(instant)),
        Err(e) => {
            tracing::trace!(error = %e, "keeping raw publish date");
            PublishedAt::new(raw, None)
        }
    }
}

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Map one provider record onto the canonical shape.
///
/// Absent fields become empty strings; an unparseable date is kept verbatim.
pub fn normalize(raw: RawArticle) -> ArticleRecord {
    match raw {
        RawArticle::Keyword(article) => normalize_keyword(article),
        RawArticle::EventIndex(article) => normalize_event(article),
    }
}

pub fn normalize_all(raws: Vec<RawArticle>) -> Vec<ArticleRecord> {
    raws.into_iter().map(normalize).collect()
}

fn normalize_keyword(article: NewsApiArticle) -> ArticleRecord {
    ArticleRecord {
        publisher: text(article.source.and_then(|s| s.name)),
        published_at: published_at(article.published_at.unwrap_or_default()),
        headline: text(article.title),
        url: text(article.url),
        source: SourceKind::KeywordSearch,
    }
}

fn normalize_event(article: EventRegistryArticle) -> ArticleRecord {
    let raw_date = article
        .date
        .filter(|d| !d.trim().is_empty())
        .or(article.date_time)
        .unwrap_or_default();

    ArticleRecord {
        publisher: text(article.source.and_then(|s| s.uri)),
        published_at: published_at(raw_date),
        headline: text(article.title),
        url: text(article.url),
        source: SourceKind::EventIndex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::event_registry::EventRegistrySource;
    use crate::adapters::newsapi::NewsApiSource;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn parses_iso_datetimes() {
        assert_eq!(
            parse_timestamp("2024-03-05T10:00:00Z").unwrap(),
            ymd_hms(2024, 3, 5, 10, 0, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-05T12:00:00.250+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
        assert_eq!(
            parse_timestamp("2024-03-05 10:00:00").unwrap(),
            ymd_hms(2024, 3, 5, 10, 0, 0)
        );
    }

    #[test]
    fn parses_bare_dates_as_midnight() {
        assert_eq!(parse_timestamp("2024-03-01").unwrap(), ymd_hms(2024, 3, 1, 0, 0, 0));
        assert_eq!(parse_timestamp("2024/03/01").unwrap(), ymd_hms(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn parses_free_form_dates() {
        let expected = ymd_hms(2024, 3, 3, 0, 0, 0);
        for raw in [
            "March 3, 2024",
            "March 3rd 2024",
            "Mar 3 2024",
            "3 March 2024",
            "3rd March, 2024",
            "Sunday, March 3rd, 2024",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap(), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn parses_rfc2822() {
        assert_eq!(
            parse_timestamp("Tue, 05 Mar 2024 10:00:00 GMT").unwrap(),
            ymd_hms(2024, 3, 5, 10, 0, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("last Tuesday-ish").unwrap_err();
        assert_eq!(err.raw, "last Tuesday-ish");
        assert!(parse_timestamp("   ").is_err());
    }

    #[test]
    fn normalizes_keyword_article() {
        let record = normalize(RawArticle::Keyword(NewsApiArticle {
            source: Some(NewsApiSource {
                id: None,
                name: Some("Variety".into()),
            }),
            title: Some(" Atlas wraps production ".into()),
            url: Some("https://variety.com/atlas".into()),
            published_at: Some("2024-03-05T10:00:00Z".into()),
            ..Default::default()
        }));

        assert_eq!(record.publisher, "Variety");
        assert_eq!(record.headline, "Atlas wraps production");
        assert_eq!(record.display_date(), "March 5, 2024");
        assert_eq!(record.published_at.raw, "2024-03-05T10:00:00Z");
        assert_eq!(record.source, SourceKind::KeywordSearch);
    }

    #[test]
    fn normalizes_event_article_with_source_uri() {
        let record = normalize(RawArticle::EventIndex(EventRegistryArticle {
            url: Some("https://deadline.com/atlas".into()),
            title: Some("Atlas casting".into()),
            date: Some("2024-03-01".into()),
            source: Some(EventRegistrySource {
                uri: Some("deadline.com".into()),
                title: Some("Deadline".into()),
            }),
            ..Default::default()
        }));

        assert_eq!(record.publisher, "deadline.com");
        assert_eq!(record.display_date(), "March 1, 2024");
        assert_eq!(record.source, SourceKind::EventIndex);
    }

    #[test]
    fn event_article_falls_back_to_date_time() {
        let record = normalize(RawArticle::EventIndex(EventRegistryArticle {
            date_time: Some("2024-03-02T07:30:00Z".into()),
            ..Default::default()
        }));
        assert_eq!(
            record.published_at.parsed,
            Some(ymd_hms(2024, 3, 2, 7, 30, 0))
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record = normalize(RawArticle::Keyword(NewsApiArticle::default()));
        assert_eq!(record.publisher, "");
        assert_eq!(record.headline, "");
        assert_eq!(record.url, "");
        assert_eq!(record.published_at.raw, "");
        assert!(record.published_at.parsed.is_none());
    }

    #[test]
    fn unparsed_date_is_kept_raw() {
        let record = normalize(RawArticle::Keyword(NewsApiArticle {
            url: Some("https://x".into()),
            published_at: Some("circa spring".into()),
            ..Default::default()
        }));
        assert_eq!(record.display_date(), "circa spring");
    }
}
