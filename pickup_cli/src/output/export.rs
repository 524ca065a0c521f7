//! Plain-text renderers for saving or pasting results.

use super::HEADERS;
use pickup_core::PickupRow;
use std::borrow::Cow;

/// RFC 4180 CSV with a header line. Rows end in `\n`.
pub fn render_csv(rows: &[PickupRow]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.join(","));
    out.push('\n');

    for row in rows {
        let fields = [&row.publisher, &row.date, &row.headline, &row.url];
        let line: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// GitHub-flavoured markdown table.
pub fn render_markdown(rows: &[PickupRow]) -> String {
    let mut out = format!("| {} |\n", HEADERS.join(" | "));
    out.push_str(&format!("|{}\n", " --- |".repeat(HEADERS.len())));

    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            markdown_cell(&row.publisher),
            markdown_cell(&row.date),
            markdown_cell(&row.headline),
            markdown_cell(&row.url),
        ));
    }
    out
}

fn markdown_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

/// One block per record, ready to paste into an email:
///
/// ```text
/// **Variety**  |  March 5, 2024  |  Atlas wraps production
///
/// Link: https://variety.com/atlas
///
/// ---
/// ```
pub fn render_email(rows: &[PickupRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "**{}**  |  {}  |  {}\n\nLink: {}\n\n---",
                row.publisher, row.date, row.headline, row.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(publisher: &str, date: &str, headline: &str, url: &str) -> PickupRow {
        PickupRow {
            publisher: publisher.into(),
            date: date.into(),
            headline: headline.into(),
            url: url.into(),
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let csv = render_csv(&[
            row("Variety", "March 5, 2024", "Atlas wraps", "https://v.com/a"),
            row("The \"Trades\"", "2024", "Plain", "https://t.com/b"),
        ]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Publisher,Date,Headline,URL");
        assert_eq!(lines[1], "Variety,\"March 5, 2024\",Atlas wraps,https://v.com/a");
        assert_eq!(lines[2], "\"The \"\"Trades\"\"\",2024,Plain,https://t.com/b");
    }

    #[test]
    fn markdown_escapes_pipes() {
        let md = render_markdown(&[row("A|B", "March 5, 2024", "x\ny", "https://a")]);
        let lines: Vec<_> = md.lines().collect();
        assert_eq!(lines[0], "| Publisher | Date | Headline | URL |");
        assert_eq!(lines[1], "| --- | --- | --- | --- |");
        assert_eq!(lines[2], "| A\\|B | March 5, 2024 | x y | https://a |");
    }

    #[test]
    fn email_blocks_follow_template() {
        let email = render_email(&[
            row("Variety", "March 5, 2024", "Atlas wraps", "https://v.com/a"),
            row("deadline.com", "March 3, 2024", "Atlas dated", "https://d.com/b"),
        ]);
        assert_eq!(
            email,
            "**Variety**  |  March 5, 2024  |  Atlas wraps\n\nLink: https://v.com/a\n\n---\n\
             **deadline.com**  |  March 3, 2024  |  Atlas dated\n\nLink: https://d.com/b\n\n---"
        );
    }

    #[test]
    fn email_is_empty_without_rows() {
        assert_eq!(render_email(&[]), "");
    }
}
