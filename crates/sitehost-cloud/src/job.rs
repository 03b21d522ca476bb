//! Job polling
//!
//! Mutations against the SiteHost API are queued as jobs. The response only
//! carries a job reference; the mutation is done once the job reaches the
//! `Completed` state. [`JobPoller`] waits for that under a timeout, tolerating
//! a bounded number of "job not found" answers while the job propagates.

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

/// Inter-poll sleep used by the remote provider
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
/// Overall deadline for a single job
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);
/// Starting delay of exponential backoff
pub const DEFAULT_MIN_TIMEOUT: Duration = Duration::from_secs(3);
/// Consecutive "not found" answers tolerated before giving up
pub const DEFAULT_NOT_FOUND_CHECKS: u32 = 60;

/// Reference to a queued remote job, as returned by a mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRef {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
}

impl JobRef {
    pub fn new(id: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_type: job_type.into(),
        }
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.job_type, self.id)
    }
}

/// Remote job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Completed,
    Failed,
}

impl JobState {
    /// Map the remote state string. Anything that is neither `Completed`
    /// nor `Failed` is still pending.
    pub fn from_remote(state: &str) -> Self {
        match state {
            "Completed" => JobState::Completed,
            "Failed" => JobState::Failed,
            _ => JobState::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "Pending"),
            JobState::Completed => write!(f, "Completed"),
            JobState::Failed => write!(f, "Failed"),
        }
    }
}

/// Observed status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default)]
    pub message: String,
}

impl JobStatus {
    pub fn new(state: JobState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    pub fn pending() -> Self {
        Self::new(JobState::Pending, "")
    }

    pub fn completed() -> Self {
        Self::new(JobState::Completed, "")
    }
}

/// The single capability the poller needs from the API client.
///
/// Implementations report an unknown job as `CloudError::ResourceNotFound`;
/// every other error is treated as fatal.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn fetch_job_status(&self, job: &JobRef) -> Result<JobStatus>;
}

/// Sleep policy between two polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Sleep `delay` between polls
    Fixed,
    /// Start at `min_timeout` and multiply per attempt, capped at `max_delay`
    Exponential { multiplier: f64, max_delay: Duration },
}

/// Poller configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JobPollConfig {
    /// Inter-poll sleep for fixed backoff
    pub delay: Duration,

    /// Overall deadline
    pub timeout: Duration,

    /// Lower bound of exponential backoff
    pub min_timeout: Duration,

    /// Consecutive "not found" answers tolerated
    pub not_found_checks: u32,

    pub backoff: Backoff,
}

impl Default for JobPollConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
            min_timeout: DEFAULT_MIN_TIMEOUT,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
            backoff: Backoff::Fixed,
        }
    }
}

impl JobPollConfig {
    /// Sleep before poll number `attempt + 1`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential {
                multiplier,
                max_delay,
            } => {
                let factor = multiplier.max(1.0).powi(attempt.min(i32::MAX as u32) as i32);
                let secs = self.min_timeout.as_secs_f64() * factor;
                if !secs.is_finite() || secs >= max_delay.as_secs_f64() {
                    max_delay
                } else {
                    Duration::from_secs_f64(secs).max(self.min_timeout)
                }
            }
        }
    }
}

/// Bounded polling state machine for remote jobs.
#[derive(Debug, Clone, Default)]
pub struct JobPoller {
    config: JobPollConfig,
}

impl JobPoller {
    pub fn new(config: JobPollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JobPollConfig {
        &self.config
    }

    /// Wait until `job` completes.
    ///
    /// Returns the final status on completion. `cancel` aborts the wait
    /// promptly, whether a status fetch or a sleep is in flight.
    pub async fn await_job(
        &self,
        source: &dyn JobStatusSource,
        job: &JobRef,
        cancel: &CancellationToken,
    ) -> Result<JobStatus> {
        // An unrepresentable deadline means no deadline.
        let deadline = Instant::now().checked_add(self.config.timeout);
        let mut not_found = 0u32;
        let mut attempt = 0u32;

        loop {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(job)),
                fetched = source.fetch_job_status(job) => fetched,
                _ = until(deadline) => return Err(self.timed_out(job)),
            };

            match fetched {
                Ok(status) => {
                    not_found = 0;
                    match status.state {
                        JobState::Completed => {
                            tracing::info!(job = %job, attempts = attempt + 1, "Job completed");
                            return Ok(status);
                        }
                        JobState::Failed => {
                            tracing::warn!(job = %job, message = %status.message, "Job failed");
                            return Err(CloudError::JobFailed {
                                job_id: job.id.clone(),
                                message: status.message,
                            });
                        }
                        JobState::Pending => {
                            tracing::debug!(job = %job, attempt, "Job still pending");
                        }
                    }
                }
                Err(e) if e.is_not_found() => {
                    not_found += 1;
                    if not_found > self.config.not_found_checks {
                        return Err(CloudError::JobNotFound {
                            job_id: job.id.clone(),
                            checks: self.config.not_found_checks,
                        });
                    }
                    tracing::warn!(
                        job = %job,
                        not_found,
                        limit = self.config.not_found_checks,
                        "Job not found yet"
                    );
                }
                Err(e) => return Err(e),
            }

            let mut wait = self.config.delay_for_attempt(attempt);
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(self.timed_out(job));
                }
                wait = wait.min(remaining);
            }
            attempt += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(job)),
                _ = sleep(wait) => {}
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(self.timed_out(job));
            }
        }
    }

    fn cancelled(&self, job: &JobRef) -> CloudError {
        tracing::debug!(job = %job, "Job wait cancelled");
        CloudError::Cancelled {
            job_id: job.id.clone(),
        }
    }

    fn timed_out(&self, job: &JobRef) -> CloudError {
        CloudError::Timeout {
            job_id: job.id.clone(),
            timeout: self.config.timeout,
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
