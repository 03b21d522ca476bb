//! docker-compose manifest decoding
//!
//! A SiteHost stack carries its whole container configuration as a compose
//! document. Several stack attributes (aliases, container type, feature
//! toggles) are not stored as remote fields and have to be recovered from it.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Environment entry prefix holding the virtual hosts of a service.
pub const VIRTUAL_HOST_PREFIX: &str = "VIRTUAL_HOST=";

/// Decoded compose document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,

    #[serde(default)]
    pub services: HashMap<String, ServiceSpec>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub networks: HashMap<String, DriverSpec>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub volumes: HashMap<String, DriverSpec>,
}

/// One service of the compose document.
///
/// Labels are a list of `key=value` strings rather than a map, the way the
/// control panel writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub build: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub restart: String,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default)]
    pub env_file: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub volumes: Vec<String>,
}

/// Top-level network or volume declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl Manifest {
    /// Decode a raw compose document.
    ///
    /// A blank document is an empty manifest; anything else that is not a
    /// compose mapping fails with `MalformedManifest`.
    pub fn decode(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(raw).map_err(|e| CloudError::MalformedManifest(e.to_string()))
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.get(name)
    }
}

/// Virtual host aliases of `service_name`, minus the stack's own label.
///
/// Only the first `VIRTUAL_HOST=` entry is considered.
pub fn extract_aliases(manifest: &Manifest, service_name: &str, self_label: &str) -> Vec<String> {
    let Some(service) = manifest.service(service_name) else {
        return Vec::new();
    };

    service
        .environment
        .iter()
        .find_map(|entry| entry.strip_prefix(VIRTUAL_HOST_PREFIX))
        .map(|hosts| {
            hosts
                .split(',')
                .map(str::trim)
                .filter(|alias| !alias.is_empty() && *alias != self_label)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Value of the first `key=value` label matching `key`, trimmed, or empty.
pub fn extract_label_value(labels: &[String], key: &str) -> String {
    let prefix = format!("{}=", key);
    labels
        .iter()
        .find_map(|label| label.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Boolean label lookup; missing or unparseable labels are `false`.
pub fn extract_bool_label(labels: &[String], key: &str) -> bool {
    parse_bool(&extract_label_value(labels, key)).unwrap_or(false)
}

/// Boolean grammar used by the control panel when writing labels.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// `version: 3` and `version: "3.8"` both decode to a string.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar version, found {:?}",
            other
        ))),
    }
}
