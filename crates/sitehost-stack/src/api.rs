//! SiteHost API collaborator
//!
//! Transport, authentication and request signing live in the API client.
//! This module only fixes the calls the reconcilers need and the shapes of
//! the responses they read.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitehost_cloud::{CanonicalIdentifier, ConfigEntry, JobRef, JobStatusSource, Result};

/// API calls used by stack and environment reconciliation.
///
/// Job status lookups come from the [`JobStatusSource`] supertrait, so the
/// same client can be handed to the job poller.
#[async_trait]
pub trait StackApi: JobStatusSource {
    /// Read a stack by server name and stack name
    async fn get_stack(&self, server_name: &str, name: &str) -> Result<StackInfo>;

    /// Read the environment variables of a stack service
    async fn get_environment(&self, id: &CanonicalIdentifier) -> Result<Vec<ConfigEntry>>;

    /// Queue an incremental environment update and return its job
    async fn update_environment(
        &self,
        id: &CanonicalIdentifier,
        entries: &[ConfigEntry],
    ) -> Result<JobRef>;
}

/// Stack information as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackInfo {
    /// Stack name, also the compose service name
    pub name: String,

    /// Human readable label, usually the primary domain
    #[serde(default)]
    pub label: String,

    /// Label of the server hosting the stack
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub ip_address: String,

    /// The compose document of the stack
    #[serde(default)]
    pub docker_file: String,

    #[serde(default)]
    pub containers: Vec<ContainerInfo>,
}

impl StackInfo {
    /// Whether any container of the stack has SSL enabled.
    pub fn ssl_enabled(&self) -> bool {
        self.containers.iter().any(|c| c.ssl_enabled)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub name: String,

    #[serde(default)]
    pub ssl_enabled: bool,
}
