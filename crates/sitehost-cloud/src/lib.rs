//! SiteHost Cloud reconciliation core
//!
//! This crate holds the pieces of the SiteHost provider that are more than
//! field-mapping glue. Resource call sites (see `sitehost-stack`) combine them
//! to read, update and import cloud stacks.
//!
//! # Components
//!
//! - **Identifier parser**: free-form stack ids → `{server, project, service}`
//! - **Change-set engine**: minimal upsert/delete diff of flat settings
//! - **Manifest decoder**: docker-compose document → derived attributes
//! - **Job poller**: waits for queued remote mutations to finish
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            sitehost-stack call sites            │
//! │        (stack read, environment update)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 sitehost-cloud                  │
//! │  ┌────────────┐ ┌───────────┐ ┌──────────────┐  │
//! │  │ identifier │ │ changeset │ │   manifest   │  │
//! │  └────────────┘ └───────────┘ └──────────────┘  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   JobPoller ── trait JobStatusSource     │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!          ┌────────▼────────┐
//!          │  API client     │
//!          │ (collaborator)  │
//!          └─────────────────┘
//! ```

pub mod changeset;
pub mod error;
pub mod identifier;
pub mod job;
pub mod manifest;

// Re-exports
pub use changeset::{Change, ChangeSet, ConfigEntry, diff};
pub use error::{CloudError, Result};
pub use identifier::CanonicalIdentifier;
pub use job::{Backoff, JobPollConfig, JobPoller, JobRef, JobState, JobStatus, JobStatusSource};
pub use manifest::{
    Manifest, ServiceSpec, VIRTUAL_HOST_PREFIX, extract_aliases, extract_bool_label,
    extract_label_value,
};

/// Cancellation signal accepted by the job poller.
pub use tokio_util::sync::CancellationToken;
