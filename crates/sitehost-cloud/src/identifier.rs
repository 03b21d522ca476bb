//! Stack identifier parsing
//!
//! Stacks are addressed by `{server, project, service}`, but users hand us
//! that key in several textual shapes: the composite id stored in state,
//! the short `server/project` form, or a control panel URL copied from the
//! browser. Everything is normalized into a [`CanonicalIdentifier`].

use crate::error::{CloudError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Control panel path form, with optional `scheme://host` and
/// `/cloud/manage-container` prefixes and an optional trailing slash.
static STACK_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:[A-Za-z][A-Za-z0-9+.\-]*://[^/]+)?/cloud/manage-container)?/server/([-_.a-zA-Z0-9]+)/stack/([-_.a-zA-Z0-9]+)/?$",
    )
    .expect("stack url pattern is a valid regex")
});

/// Normalized `{server, project, service}` key of a cloud stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
    pub server_name: String,
    pub project: String,
    pub service: String,
}

impl CanonicalIdentifier {
    /// Build an identifier for a single-service stack (`service == project`).
    pub fn for_project(server_name: impl Into<String>, project: impl Into<String>) -> Self {
        let project = project.into();
        Self {
            server_name: server_name.into(),
            service: project.clone(),
            project,
        }
    }

    /// Parse any accepted identifier shape.
    ///
    /// Shapes are tried in order:
    /// 1. `server/project/service`
    /// 2. `server/project` (service defaults to project)
    /// 3. `[scheme://host][/cloud/manage-container]/server/{server}/stack/{project}[/]`
    pub fn parse(id: &str) -> Result<Self> {
        let segments: Vec<&str> = id.split('/').collect();
        let all_present = segments.iter().all(|s| !s.is_empty());

        match segments.as_slice() {
            [server, project, service] if all_present => {
                return Ok(Self {
                    server_name: (*server).to_string(),
                    project: (*project).to_string(),
                    service: (*service).to_string(),
                });
            }
            [server, project] if all_present => {
                return Ok(Self::for_project(*server, *project));
            }
            _ => {}
        }

        if let Some(caps) = STACK_URL_PATTERN.captures(id) {
            return Ok(Self::for_project(&caps[1], &caps[2]));
        }

        Err(CloudError::InvalidIdentifier { id: id.to_string() })
    }

    /// Composite state id, always in the 3-segment form.
    pub fn state_id(&self) -> String {
        self.to_string()
    }

    /// Stack-level id (`server/project`) used by the stack resource.
    pub fn stack_id(&self) -> String {
        format!("{}/{}", self.server_name, self.project)
    }
}

impl fmt::Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.server_name, self.project, self.service)
    }
}

impl FromStr for CanonicalIdentifier {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
