use colored::Colorize;
use sitehost_cloud::CanonicalIdentifier;

pub fn handle(raw: &str, json: bool) -> anyhow::Result<()> {
    let id = CanonicalIdentifier::parse(raw)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&id)?);
        return Ok(());
    }

    println!("server:   {}", id.server_name.cyan());
    println!("project:  {}", id.project.cyan());
    println!("service:  {}", id.service.cyan());
    println!("state id: {}", id.state_id().bold());
    Ok(())
}
