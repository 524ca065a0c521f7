use crate::cli::{Cli, FetchArgs, OutputFormat};
use crate::commands::Result;
use crate::output::{self, EMPTY_MESSAGE};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pickup_core::auth_store::FileAuthStore;
use pickup_core::{CancellationToken, Pipeline, PickupConfig, PickupError, QuerySpec, RunReport};
use std::path::PathBuf;

/// Run the fetch command: query every provider and print or save the merged results
pub async fn run(cli: &Cli, args: &FetchArgs) -> Result<()> {
    let spec = query_spec(args);
    // Reject empty names before credentials are looked at
    let query = spec.query()?;

    let store = FileAuthStore::new_default();
    let config = PickupConfig::load(&store)?;
    let pipeline = Pipeline::from_config(&config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Searching press for '{}' ({} to {})...",
        query, spec.start_date, spec.end_date
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = pipeline.run_cancellable(&spec, cancel).await;
    interrupt.abort();
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(PickupError::Cancelled) => {
            tracing::debug!("fetch interrupted");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    present(cli, args, &report)
}

fn query_spec(args: &FetchArgs) -> QuerySpec {
    let today = Local::now().date_naive();
    QuerySpec::new(
        args.client.as_str(),
        args.project.as_str(),
        args.from.unwrap_or(today),
        args.to.unwrap_or(today),
    )
}

fn present(cli: &Cli, args: &FetchArgs, report: &RunReport) -> Result<()> {
    let styled = cli.styled();

    for warning in &report.warnings {
        output::print_warning(warning, styled);
    }

    // JSON always carries the report so scripts can tell "empty" from "failed"
    if report.is_empty() && cli.output != OutputFormat::Json {
        output::print_info(EMPTY_MESSAGE, styled);
        return Ok(());
    }

    let rendered = output::render(report, cli.output, output::terminal_width(), styled)?;
    println!("{}", rendered);

    if cli.output == OutputFormat::Table {
        let count = report.results().map_or(0, |r| r.len());
        let footer = format!(
            "{} pickups in {}ms",
            count,
            report.duration_ms.unwrap_or_default()
        );
        if styled {
            println!("{}", footer.dimmed());
        } else {
            println!("{}", footer);
        }
    }

    if args.save && !report.is_empty() {
        let path = save(cli, args, report)?;
        if styled {
            eprintln!("{} {}", "Saved".green().bold(), path.display());
        } else {
            eprintln!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// Writes the report next to `--save-dir` (or the working directory).
///
/// A table is saved as CSV; the other formats are saved as rendered.
fn save(cli: &Cli, args: &FetchArgs, report: &RunReport) -> Result<PathBuf> {
    let format = match cli.output {
        OutputFormat::Table => OutputFormat::Csv,
        other => other,
    };
    let dir = args.save_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(output::export_file_name(&args.client, &args.project, format));
    let contents = output::render(report, format, output::terminal_width(), false)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "saved pickups");
    Ok(path)
}
