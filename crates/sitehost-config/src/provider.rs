//! Provider settings
//!
//! Credentials and job polling settings, loaded from YAML and overridable
//! from the environment. The resulting struct is passed explicitly to the
//! components that need it; nothing here is global.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use sitehost_cloud::{Backoff, JobPollConfig};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_API_KEY: &str = "SITEHOST_API_KEY";
pub const ENV_CLIENT_ID: &str = "SITEHOST_CLIENT_ID";
pub const ENV_API_ENDPOINT: &str = "SITEHOST_API_ENDPOINT";

/// Connection settings for the SiteHost API plus poller tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub client_id: String,
    /// Overrides the API client's default endpoint
    pub api_endpoint: Option<String>,
    pub job: JobPollSettings,
}

/// Job poller settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPollSettings {
    pub delay_secs: u64,
    pub timeout_secs: u64,
    pub min_timeout_secs: u64,
    pub not_found_checks: u32,
    /// Enables exponential backoff when greater than 1
    pub backoff_multiplier: Option<f64>,
    pub max_delay_secs: u64,
}

impl Default for JobPollSettings {
    fn default() -> Self {
        let poll = JobPollConfig::default();
        Self {
            delay_secs: poll.delay.as_secs(),
            timeout_secs: poll.timeout.as_secs(),
            min_timeout_secs: poll.min_timeout.as_secs(),
            not_found_checks: poll.not_found_checks,
            backoff_multiplier: None,
            max_delay_secs: 30,
        }
    }
}

impl From<&JobPollSettings> for JobPollConfig {
    fn from(settings: &JobPollSettings) -> Self {
        let backoff = match settings.backoff_multiplier {
            Some(multiplier) if multiplier > 1.0 => Backoff::Exponential {
                multiplier,
                max_delay: Duration::from_secs(settings.max_delay_secs),
            },
            _ => Backoff::Fixed,
        };

        JobPollConfig {
            delay: Duration::from_secs(settings.delay_secs),
            timeout: Duration::from_secs(settings.timeout_secs),
            min_timeout: Duration::from_secs(settings.min_timeout_secs),
            not_found_checks: settings.not_found_checks,
            backoff,
        }
    }
}

impl ProviderConfig {
    /// Load a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: ProviderConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded provider config from {}", path.display());
        Ok(config)
    }

    /// Build the config from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Locate and load the config file, apply environment overrides and
    /// validate. A missing file is fine when the environment has everything.
    pub fn resolve() -> Result<Self> {
        match crate::find_config_file() {
            Ok(path) => Self::resolve_from(path),
            Err(ConfigError::ConfigFileNotFound(_)) => Self::from_env().validated(),
            Err(e) => Err(e),
        }
    }

    /// Load an explicitly chosen file, apply environment overrides and
    /// validate. A missing file is an error here.
    pub fn resolve_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env();
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Override settings from `SITEHOST_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(api_key) = get(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(client_id) = get(ENV_CLIENT_ID) {
            self.client_id = client_id;
        }
        if let Some(endpoint) = get(ENV_API_ENDPOINT) {
            self.api_endpoint = Some(endpoint);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingSetting("api_key", ENV_API_KEY));
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingSetting("client_id", ENV_CLIENT_ID));
        }
        self.endpoint_url()?;
        Ok(())
    }

    /// Parsed API endpoint, if one is configured.
    pub fn endpoint_url(&self) -> Result<Option<Url>> {
        let Some(endpoint) = self.api_endpoint.as_deref() else {
            return Ok(None);
        };

        let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "expected an http(s) URL".to_string(),
            });
        }

        tracing::info!("SiteHost client configured for URL: {}", url);
        Ok(Some(url))
    }

    pub fn poll_config(&self) -> JobPollConfig {
        JobPollConfig::from(&self.job)
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
