use crate::cli::{Cli, ConfigAction, OutputFormat, Provider};
use crate::commands::{CommandError, Result};
use owo_colors::OwoColorize;
use pickup_core::auth_store::{AuthStore, FileAuthStore};
use serde::Serialize;

pub fn run(cli: &Cli, action: ConfigAction) -> Result<()> {
    let store = FileAuthStore::new_default();
    match action {
        ConfigAction::Show => show_config(cli, &store, |var| std::env::var(var).ok()),
        ConfigAction::Set { provider, value } => set_config(cli, &store, provider, &value),
        ConfigAction::Remove { provider } => remove_config(cli, &store, provider),
    }
}

/// Where a provider's key would be read from on the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum KeySource {
    Stored,
    Environment,
    Missing,
}

#[derive(Debug, Serialize)]
struct ProviderStatus {
    provider: &'static str,
    source: KeySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    required: bool,
}

fn stored_key(store: &dyn AuthStore, provider: Provider) -> Option<String> {
    store
        .load(provider.key())
        .and_then(|auth| auth.get("api_key").cloned())
        .filter(|k| !k.trim().is_empty())
}

/// Mirrors the lookup order used when loading the pipeline configuration.
fn provider_status<F>(store: &dyn AuthStore, provider: Provider, env: &F) -> ProviderStatus
where
    F: Fn(&str) -> Option<String>,
{
    let (source, key) = match stored_key(store, provider) {
        Some(key) => (KeySource::Stored, Some(key)),
        None => match env(provider.env_var()).filter(|k| !k.trim().is_empty()) {
            Some(key) => (KeySource::Environment, Some(key)),
            None => (KeySource::Missing, None),
        },
    };
    ProviderStatus {
        provider: provider.key(),
        source,
        key: key.as_deref().map(mask_key),
        required: provider == Provider::Newsapi,
    }
}

/// Keeps the first four characters, e.g. `abcd****`.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

fn show_config<F>(cli: &Cli, store: &FileAuthStore, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let statuses: Vec<ProviderStatus> = Provider::ALL
        .iter()
        .map(|p| provider_status(store, *p, &env))
        .collect();

    if cli.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!();
    println!("{}", "Provider Keys".bold().cyan());
    println!("{}", "=============".cyan());
    println!();
    println!("Credential file: {}", store.config_path().display().dimmed());
    println!();

    for (status, provider) in statuses.iter().zip(Provider::ALL) {
        let state = match status.source {
            KeySource::Stored => "stored".green().to_string(),
            KeySource::Environment => format!("from ${}", provider.env_var()).blue().to_string(),
            KeySource::Missing if status.required => "missing (required)".red().to_string(),
            KeySource::Missing => "not set (optional)".yellow().to_string(),
        };
        println!(
            "  {} - {} {}",
            status.provider.cyan().bold(),
            state,
            status.key.as_deref().unwrap_or("").dimmed()
        );
    }
    println!();
    println!(
        "Set a key: {}",
        "pickup config set <newsapi|newsapi-ai> --value <KEY>".cyan()
    );
    println!();
    Ok(())
}

fn set_config(cli: &Cli, store: &dyn AuthStore, provider: Provider, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::InvalidConfig(format!(
            "empty API key for {}",
            provider.key()
        )));
    }

    let mut auth = store.load(provider.key()).unwrap_or_default();
    auth.insert("api_key".to_string(), value.to_string());
    store.save(provider.key(), &auth)?;

    if cli.styled() {
        println!(
            "{} API key saved for {}",
            "Success!".green().bold(),
            provider.key().cyan()
        );
    } else {
        println!("API key saved for {}", provider.key());
    }
    Ok(())
}

fn remove_config(cli: &Cli, store: &dyn AuthStore, provider: Provider) -> Result<()> {
    let removed = store.remove(provider.key())?;
    let message = if removed {
        format!("Removed stored key for {}", provider.key())
    } else {
        format!("No stored key for {}", provider.key())
    };
    if cli.styled() && removed {
        println!("{}", message.green());
    } else {
        println!("{}", message);
    }
    Ok(())
}
