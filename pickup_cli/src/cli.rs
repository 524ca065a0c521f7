use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pickup_core::config::{NEWSAPI_AI_KEY_ENV, NEWSAPI_AI_PROVIDER, NEWSAPI_KEY_ENV, NEWSAPI_PROVIDER};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pickup")]
#[command(about = "Pickup - collect press mentions of a client and project from news providers")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  pickup config set newsapi --value <KEY>                  Store your NewsAPI.org key
  pickup fetch --client \"Jane Doe\" --project Atlas         Today's pickups
  pickup fetch -c \"Jane Doe\" -p Atlas --from 2024-03-01 --to 2024-03-31

\x1b[1;36mExports:\x1b[0m
  pickup fetch ... --output csv --save                     Write Jane_Doe_Atlas_pickup.csv
  pickup fetch ... --output email                          Paste-ready email blocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn styled(&self) -> bool {
        !self.no_color
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search every configured provider for press pickups
    ///
    /// Combines the client and project names into one query, fetches from
    /// all providers, removes duplicate links and lists the newest first.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  pickup fetch --client \"Jane Doe\" --project Atlas
  pickup fetch -c \"Jane Doe\" -p Atlas --from 2024-03-01 --to 2024-03-31
  pickup fetch -c \"Jane Doe\" -p Atlas --output markdown --save --save-dir ./reports")]
    Fetch(FetchArgs),

    /// Manage provider API keys
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Client (talent) name
    #[arg(short, long)]
    pub client: String,

    /// Project or film name
    #[arg(short, long)]
    pub project: String,

    /// First day of the range, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the range, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Also write the results to `<client>_<project>_pickup.<ext>`
    #[arg(long)]
    pub save: bool,

    /// Directory for --save (defaults to the current directory)
    #[arg(long, requires = "save")]
    pub save_dir: Option<PathBuf>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show which providers have a key and where it comes from
    Show,
    /// Store an API key for a provider
    Set {
        provider: Provider,
        /// API key
        #[arg(long)]
        value: String,
    },
    /// Remove a stored API key
    Remove { provider: Provider },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// NewsAPI.org keyword search (required)
    Newsapi,
    /// newsapi.ai / Event Registry (optional)
    NewsapiAi,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Newsapi, Provider::NewsapiAi];

    /// Credential store key
    pub fn key(&self) -> &'static str {
        match self {
            Provider::Newsapi => NEWSAPI_PROVIDER,
            Provider::NewsapiAi => NEWSAPI_AI_PROVIDER,
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Newsapi => NEWSAPI_KEY_ENV,
            Provider::NewsapiAi => NEWSAPI_AI_KEY_ENV,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table in the terminal
    Table,
    /// CSV with a Publisher,Date,Headline,URL header
    Csv,
    /// Markdown table
    Markdown,
    /// Email-ready text blocks
    Email,
    /// JSON report including warnings
    Json,
}

impl OutputFormat {
    /// Extension used by `--save`; a table is saved as CSV.
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Table | OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
            OutputFormat::Email => "txt",
            OutputFormat::Json => "json",
        }
    }
}
