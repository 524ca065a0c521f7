use crate::cli::OutputFormat;
use crate::commands::Result;
use owo_colors::OwoColorize;
use pickup_core::{FetchFailed, PickupRow, RunReport};
use serde::Serialize;

mod export;
mod table;

pub use export::{render_csv, render_email, render_markdown};
pub use table::render_table;

/// Column headers shared by the table, CSV and markdown renderers.
pub const HEADERS: [&str; 4] = ["Publisher", "Date", "Headline", "URL"];

pub const EMPTY_MESSAGE: &str = "No press pickups found for that query and date range.";

/// JSON view of a run: display rows plus any provider warnings.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    query: &'a str,
    count: usize,
    rows: Vec<PickupRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<FetchFailed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
}

fn report_rows(report: &RunReport) -> Vec<PickupRow> {
    report.results().map(|set| set.rows()).unwrap_or_default()
}

/// Renders a report in `format`. The table renderer is laid out for `width`
/// columns; the file formats ignore it.
pub fn render(report: &RunReport, format: OutputFormat, width: u16, styled: bool) -> Result<String> {
    let rows = report_rows(report);
    let rendered = match format {
        OutputFormat::Table => render_table(&rows, width, styled),
        OutputFormat::Csv => render_csv(&rows),
        OutputFormat::Markdown => render_markdown(&rows),
        OutputFormat::Email => render_email(&rows),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonReport {
            query: &report.query,
            count: rows.len(),
            rows,
            warnings: report.warnings.clone(),
            duration_ms: report.duration_ms,
        })?,
    };
    Ok(rendered)
}

/// `{client}_{project}_pickup.{ext}` with spaces and path separators
/// replaced by underscores.
pub fn export_file_name(client: &str, project: &str, format: OutputFormat) -> String {
    format!(
        "{}_{}_pickup.{}",
        client.trim(),
        project.trim(),
        format.file_extension()
    )
    .replace([' ', '/', '\\'], "_")
}

/// Get the terminal width, defaulting to 100 if detection fails
pub fn terminal_width() -> u16 {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0)
        .unwrap_or(100)
}

pub fn print_warning(warning: &FetchFailed, styled: bool) {
    if styled {
        eprintln!("{} {}", "⚠".yellow(), warning.to_string().yellow());
    } else {
        eprintln!("Warning: {}", warning);
    }
}

pub fn print_info(message: &str, styled: bool) {
    if styled {
        println!("{} {}", "ℹ".blue(), message);
    } else {
        println!("{}", message);
    }
}
