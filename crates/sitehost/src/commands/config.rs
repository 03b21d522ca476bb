use colored::Colorize;
use sitehost_config::{ConfigError, ProviderConfig};
use std::path::Path;

pub fn handle(file: Option<&Path>) -> anyhow::Result<()> {
    let config = match file {
        Some(path) => {
            tracing::debug!("Using config file from the command line: {}", path.display());
            println!("config file: {}", path.display().to_string().cyan());
            ProviderConfig::resolve_from(path)?
        }
        None => {
            match sitehost_config::find_config_file() {
                Ok(path) => println!("config file: {}", path.display().to_string().cyan()),
                Err(ConfigError::ConfigFileNotFound(searched)) => {
                    tracing::debug!(locations = searched.len(), "No config file found");
                    println!("{}", "No config file found, using environment only".yellow())
                }
                Err(e) => return Err(e.into()),
            }
            ProviderConfig::resolve()?
        }
    };
    let poll = config.poll_config();

    println!("{}", "✓ Provider config is valid".green().bold());
    println!("  client id:    {}", config.client_id);
    println!("  api key:      {}", config.masked_api_key());
    println!(
        "  endpoint:     {}",
        config.api_endpoint.as_deref().unwrap_or("(client default)")
    );
    println!(
        "  job polling:  every {:?}, timeout {:?}, {} not-found checks",
        poll.delay, poll.timeout, poll.not_found_checks
    );

    Ok(())
}
