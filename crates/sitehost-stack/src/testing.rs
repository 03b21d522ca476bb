//! In-memory `StackApi` for reconciler tests

use crate::api::{StackApi, StackInfo};
use async_trait::async_trait;
use sitehost_cloud::{
    CanonicalIdentifier, CloudError, ConfigEntry, JobRef, JobState, JobStatus, JobStatusSource,
    Result,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeApi {
    pub stacks: HashMap<String, StackInfo>,
    pub environments: Mutex<HashMap<String, HashMap<String, String>>>,
    pub updates: Mutex<Vec<Vec<ConfigEntry>>>,
    /// Final job state reported for every queued update
    pub job_outcome: Option<JobStatus>,
}

impl FakeApi {
    pub fn with_stack(mut self, server_name: &str, stack: StackInfo) -> Self {
        self.stacks
            .insert(format!("{}/{}", server_name, stack.name), stack);
        self
    }

    pub fn with_environment(self, id: &str, vars: &[(&str, &str)]) -> Self {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.environments
            .lock()
            .unwrap()
            .insert(id.to_string(), vars);
        self
    }

    pub fn failing_jobs(mut self, message: &str) -> Self {
        self.job_outcome = Some(JobStatus::new(JobState::Failed, message));
        self
    }

    pub fn update_calls(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl JobStatusSource for FakeApi {
    async fn fetch_job_status(&self, _job: &JobRef) -> Result<JobStatus> {
        Ok(self
            .job_outcome
            .clone()
            .unwrap_or_else(JobStatus::completed))
    }
}

#[async_trait]
impl StackApi for FakeApi {
    async fn get_stack(&self, server_name: &str, name: &str) -> Result<StackInfo> {
        self.stacks
            .get(&format!("{}/{}", server_name, name))
            .cloned()
            .ok_or_else(|| CloudError::ResourceNotFound(format!("stack {}", name)))
    }

    async fn get_environment(&self, id: &CanonicalIdentifier) -> Result<Vec<ConfigEntry>> {
        let environments = self.environments.lock().unwrap();
        let vars = environments
            .get(&id.state_id())
            .ok_or_else(|| CloudError::ResourceNotFound(id.state_id()))?;
        Ok(vars
            .iter()
            .map(|(name, content)| ConfigEntry {
                name: name.clone(),
                content: content.clone(),
            })
            .collect())
    }

    async fn update_environment(
        &self,
        id: &CanonicalIdentifier,
        entries: &[ConfigEntry],
    ) -> Result<JobRef> {
        let mut environments = self.environments.lock().unwrap();
        let vars = environments.entry(id.state_id()).or_default();
        for entry in entries {
            if entry.content.is_empty() {
                vars.remove(&entry.name);
            } else {
                vars.insert(entry.name.clone(), entry.content.clone());
            }
        }

        let mut updates = self.updates.lock().unwrap();
        updates.push(entries.to_vec());
        Ok(JobRef::new(format!("job-{}", updates.len()), "daemon"))
    }
}
