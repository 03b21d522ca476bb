use crate::utils;
use colored::Colorize;
use sitehost_cloud::{Change, diff};
use std::path::Path;

pub fn handle(observed: &Path, desired: &Path, uppercase: bool, json: bool) -> anyhow::Result<()> {
    let mut observed_settings = utils::load_settings(observed)?;
    let mut desired_settings = utils::load_settings(desired)?;

    if uppercase {
        observed_settings = utils::uppercase_keys(observed_settings);
        desired_settings = utils::uppercase_keys(desired_settings);
    }

    let changes = diff(&observed_settings, &desired_settings);
    tracing::debug!(
        observed = observed_settings.len(),
        desired = desired_settings.len(),
        changes = changes.len(),
        "Computed environment change-set"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&changes.to_entries())?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("{}", "No changes. The environment is up to date.".green());
        return Ok(());
    }

    for change in &changes {
        match change {
            Change::Upsert { .. } => println!("  {}", change.to_string().yellow()),
            Change::Delete { .. } => println!("  {}", change.to_string().red()),
        }
    }
    println!();
    println!(
        "{} to set, {} to remove",
        changes.upserts().count(),
        changes.deletions().count()
    );

    Ok(())
}
