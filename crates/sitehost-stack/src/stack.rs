//! Cloud stack reconciliation

use crate::api::StackApi;
use crate::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use sitehost_cloud::{
    CanonicalIdentifier, Manifest, extract_aliases, extract_bool_label, extract_label_value,
};

pub const LABEL_CONTAINER_TYPE: &str = "nz.sitehost.container.type";
pub const LABEL_IMAGE_UPDATE: &str = "nz.sitehost.container.image_update";
pub const LABEL_MONITORED: &str = "nz.sitehost.container.monitored";
pub const LABEL_BACKUP_DISABLE: &str = "nz.sitehost.container.backup_disable";

/// Observed attributes of a stack, including those derived from its manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackAttributes {
    /// `server/name`
    pub id: String,
    pub server_name: String,
    pub name: String,
    pub label: String,
    pub server_label: String,
    pub server_ip_address: String,
    pub docker_file: String,
    pub aliases: Vec<String>,
    pub container_type: String,
    pub image_update: bool,
    pub monitored: bool,
    pub backup_disable: bool,
    pub enable_ssl: bool,
}

/// Derived attributes of one compose service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceLabels {
    pub aliases: Vec<String>,
    pub container_type: String,
    pub image_update: bool,
    pub monitored: bool,
    pub backup_disable: bool,
}

impl ServiceLabels {
    /// Read the derived attributes of `service` from a decoded manifest.
    ///
    /// A service missing from the manifest has no aliases and every toggle off.
    pub fn from_manifest(manifest: &Manifest, service: &str, self_label: &str) -> Self {
        let labels = manifest
            .service(service)
            .map(|s| s.labels.as_slice())
            .unwrap_or_default();

        Self {
            aliases: extract_aliases(manifest, service, self_label),
            container_type: extract_label_value(labels, LABEL_CONTAINER_TYPE),
            image_update: extract_bool_label(labels, LABEL_IMAGE_UPDATE),
            monitored: extract_bool_label(labels, LABEL_MONITORED),
            backup_disable: extract_bool_label(labels, LABEL_BACKUP_DISABLE),
        }
    }
}

/// Reads and imports cloud stacks.
pub struct StackReconciler<A> {
    api: A,
}

impl<A: StackApi> StackReconciler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read a stack and recover the attributes encoded in its manifest.
    ///
    /// A manifest that fails to decode fails the read.
    pub async fn read(&self, server_name: &str, name: &str) -> Result<StackAttributes> {
        let stack = self
            .api
            .get_stack(server_name, name)
            .await
            .map_err(|source| StackError::StackRead {
                server: server_name.to_string(),
                name: name.to_string(),
                source,
            })?;

        let manifest = Manifest::decode(&stack.docker_file)?;
        // Single-service stacks: the compose service is named after the stack.
        let derived = ServiceLabels::from_manifest(&manifest, &stack.name, &stack.label);

        tracing::debug!(
            server = server_name,
            stack = name,
            aliases = derived.aliases.len(),
            "Read stack"
        );

        Ok(StackAttributes {
            id: format!("{}/{}", server_name, name),
            server_name: server_name.to_string(),
            name: name.to_string(),
            enable_ssl: stack.ssl_enabled(),
            label: stack.label,
            server_label: stack.server,
            server_ip_address: stack.ip_address,
            docker_file: stack.docker_file,
            aliases: derived.aliases,
            container_type: derived.container_type,
            image_update: derived.image_update,
            monitored: derived.monitored,
            backup_disable: derived.backup_disable,
        })
    }

    /// Resolve a user-supplied import id into the canonical stack key.
    pub fn import(&self, raw_id: &str) -> Result<CanonicalIdentifier> {
        let id = CanonicalIdentifier::parse(raw_id).map_err(|source| StackError::Import {
            resource: "stack",
            source,
        })?;
        tracing::info!(id = %id, "Imported stack");
        Ok(id)
    }
}
