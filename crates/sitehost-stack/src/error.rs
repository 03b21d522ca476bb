//! Stack reconciliation error types

use sitehost_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Error retrieving stack info: server {server}, stack {name}, {source}")]
    StackRead {
        server: String,
        name: String,
        source: CloudError,
    },

    #[error("Error retrieving environment info: {0}")]
    EnvironmentRead(#[source] CloudError),

    #[error("Error updating environment info: {0}")]
    EnvironmentUpdate(#[source] CloudError),

    #[error("Error importing {resource}: {source}")]
    Import {
        resource: &'static str,
        source: CloudError,
    },

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl StackError {
    /// The underlying core error, whatever the call site.
    pub fn cloud_error(&self) -> &CloudError {
        match self {
            StackError::StackRead { source, .. } | StackError::Import { source, .. } => source,
            StackError::EnvironmentRead(e) | StackError::EnvironmentUpdate(e) => e,
            StackError::Cloud(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackError>;
