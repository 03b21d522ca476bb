//! SiteHost cloud stack reconciliation
//!
//! Call sites that combine the `sitehost-cloud` core with a SiteHost API
//! client: reading stacks (including attributes recovered from their
//! compose manifest), updating stack environments through minimal
//! change-sets, and importing resources from any accepted id shape.
//!
//! # Requirements
//!
//! - An API client implementing [`StackApi`] (transport and authentication
//!   are the client's concern)
//!
//! # Example
//!
//! ```ignore
//! use sitehost_cloud::{CancellationToken, JobPollConfig};
//! use sitehost_stack::EnvironmentReconciler;
//!
//! let reconciler = EnvironmentReconciler::new(client, JobPollConfig::default());
//! let id = reconciler.import("ch-server1/myproject")?;
//!
//! let outcome = reconciler
//!     .update(&id, &desired, &CancellationToken::new())
//!     .await?;
//! ```

pub mod api;
pub mod environment;
pub mod error;
pub mod stack;

#[cfg(test)]
mod testing;

pub use api::{ContainerInfo, StackApi, StackInfo};
pub use environment::{EnvironmentReconciler, EnvironmentSettings, UpdateOutcome};
pub use error::{Result, StackError};
pub use stack::{ServiceLabels, StackAttributes, StackReconciler};
