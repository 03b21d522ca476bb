//! Stack environment reconciliation
//!
//! Environment variables of a stack service can only be changed
//! incrementally. Updates send the minimal change-set and wait for the
//! resulting job before reporting success.

use crate::api::StackApi;
use crate::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use sitehost_cloud::{
    CanonicalIdentifier, CancellationToken, ChangeSet, JobPollConfig, JobPoller, JobRef,
    JobStatus, diff,
};
use std::collections::HashMap;

/// Observed environment of a stack service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    pub id: CanonicalIdentifier,
    /// Variable names are upper-cased
    pub settings: HashMap<String, String>,
}

/// Result of an environment update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Observed and desired settings already match; nothing was sent
    Unchanged,
    /// The change-set was sent and its job completed
    Applied {
        changes: ChangeSet,
        job: JobRef,
        status: JobStatus,
    },
}

impl UpdateOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

/// Reads, updates and imports stack environments.
pub struct EnvironmentReconciler<A> {
    api: A,
    poller: JobPoller,
}

impl<A: StackApi> EnvironmentReconciler<A> {
    pub fn new(api: A, poll: JobPollConfig) -> Self {
        Self {
            api,
            poller: JobPoller::new(poll),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read the current settings of a stack service.
    pub async fn read(&self, id: &CanonicalIdentifier) -> Result<EnvironmentSettings> {
        let vars = self
            .api
            .get_environment(id)
            .await
            .map_err(StackError::EnvironmentRead)?;

        let settings = upper_case_names(vars.into_iter().map(|v| (v.name, v.content)));

        Ok(EnvironmentSettings {
            id: id.clone(),
            settings,
        })
    }

    /// Bring the remote settings to `desired`, diffing against what the
    /// remote side currently reports.
    pub async fn update(
        &self,
        id: &CanonicalIdentifier,
        desired: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<UpdateOutcome> {
        let observed = self.read(id).await?.settings;
        self.update_from(id, &observed, desired, cancel).await
    }

    /// Bring the remote settings from `observed` (e.g. prior state) to
    /// `desired`.
    ///
    /// Both sides are compared by upper-cased name, the form `read` reports.
    /// No API call is made when the change-set is empty.
    pub async fn update_from(
        &self,
        id: &CanonicalIdentifier,
        observed: &HashMap<String, String>,
        desired: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<UpdateOutcome> {
        let observed = upper_case_names(observed.clone());
        let desired = upper_case_names(desired.clone());
        let changes = diff(&observed, &desired);
        if changes.is_empty() {
            tracing::debug!(id = %id, "Environment unchanged, skipping update");
            return Ok(UpdateOutcome::Unchanged);
        }

        tracing::info!(
            id = %id,
            upserts = changes.upserts().count(),
            deletions = changes.deletions().count(),
            "Updating environment"
        );

        let job = self
            .api
            .update_environment(id, &changes.to_entries())
            .await
            .map_err(StackError::EnvironmentUpdate)?;

        let status = self.poller.await_job(&self.api, &job, cancel).await?;

        Ok(UpdateOutcome::Applied {
            changes,
            job,
            status,
        })
    }

    /// Environments cannot be removed remotely; they go away with the stack.
    pub fn delete(&self, id: &CanonicalIdentifier) {
        tracing::debug!(id = %id, "Environment delete is a no-op");
    }

    /// Resolve a user-supplied import id into the canonical key.
    pub fn import(&self, raw_id: &str) -> Result<CanonicalIdentifier> {
        let id = CanonicalIdentifier::parse(raw_id).map_err(|source| StackError::Import {
            resource: "stack environment",
            source,
        })?;
        tracing::info!(id = %id, "Imported stack environment");
        Ok(id)
    }
}

fn upper_case_names(
    settings: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    settings
        .into_iter()
        .map(|(name, content)| (name.to_uppercase(), content))
        .collect()
}
