use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the verbosity flag
    let default_filter = match cli.verbose {
        0 => "pickup_cli=info,pickup_core=warn",
        1 => "pickup_cli=debug,pickup_core=debug",
        _ => "pickup_cli=trace,pickup_core=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Fetch(args) => fetch::run(&cli, args).await,
        Commands::Config { action } => config::run(&cli, action.clone()),
    };

    if let Err(e) = result {
        if cli.styled() {
            eprintln!("{}: {}", "Error".red().bold(), e);
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}
