use anyhow::Context;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

/// Read a flat settings map from a YAML or JSON file.
///
/// Scalar values are stringified (`PORT: 80` becomes `"80"`); a null value
/// becomes an empty string. Nested values are rejected.
pub fn load_settings(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("invalid settings in {}", path.display()))
}

pub fn parse_settings(content: &str) -> anyhow::Result<HashMap<String, String>> {
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let raw: HashMap<String, Value> = serde_yaml::from_str(content)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => anyhow::bail!("value of {} is not a scalar", key),
            };
            Ok((key, value))
        })
        .collect()
}

pub fn uppercase_keys(settings: HashMap<String, String>) -> HashMap<String, String> {
    settings
        .into_iter()
        .map(|(k, v)| (k.to_uppercase(), v))
        .collect()
}
