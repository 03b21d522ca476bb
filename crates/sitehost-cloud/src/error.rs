//! Reconciliation core error types

use std::time::Duration;
use thiserror::Error;

/// Accepted identifier shapes, listed in the `InvalidIdentifier` message.
pub const ACCEPTED_ID_FORMATS: &str = "\
https://cp.sitehost.nz/cloud/manage-container/server/[server_name]/stack/[project]\n\
/cloud/manage-container/server/[server_name]/stack/[project]\n\
/server/[server_name]/stack/[project]\n\
[server_name]/[project]/[service]\n\
[server_name]/[project]";

/// Reconciliation core errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error(
        "invalid id: {id}.\n\nThe ID should be in one of the following formats:\n{formats}",
        formats = ACCEPTED_ID_FORMATS
    )]
    InvalidIdentifier { id: String },

    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job {job_id} not found after {checks} consecutive checks")]
    JobNotFound { job_id: String, checks: u32 },

    #[error("Timeout: job {job_id} did not finish within {timeout:?}")]
    Timeout { job_id: String, timeout: Duration },

    #[error("Wait for job {job_id} was cancelled")]
    Cancelled { job_id: String },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CloudError {
    /// Whether the collaborator reported the addressed resource as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::ResourceNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
