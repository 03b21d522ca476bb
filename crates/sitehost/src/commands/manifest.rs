use anyhow::Context;
use colored::Colorize;
use sitehost_cloud::Manifest;
use sitehost_stack::ServiceLabels;
use std::path::Path;

pub fn handle(file: &Path, service: &str, label: &str) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let manifest = Manifest::decode(&raw)?;
    tracing::debug!(
        file = %file.display(),
        services = manifest.services.len(),
        "Decoded manifest"
    );

    if manifest.service(service).is_none() {
        let mut known: Vec<&str> = manifest.services.keys().map(String::as_str).collect();
        known.sort_unstable();
        anyhow::bail!(
            "service '{}' not found in manifest (services: {})",
            service,
            known.join(", ")
        );
    }

    let derived = ServiceLabels::from_manifest(&manifest, service, label);

    println!("service:        {}", service.cyan());
    if derived.aliases.is_empty() {
        println!("aliases:        (none)");
    } else {
        println!("aliases:        {}", derived.aliases.join(", "));
    }
    println!("type:           {}", derived.container_type);
    println!("image_update:   {}", derived.image_update);
    println!("monitored:      {}", derived.monitored);
    println!("backup_disable: {}", derived.backup_disable);

    Ok(())
}
