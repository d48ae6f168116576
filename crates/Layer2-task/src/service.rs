//! Job service trait - the operations a transport exposes

use crate::job::{JobId, JobRequest, JobStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rce_foundation::Result;

/// Transport-facing job operations. Implement to put the agent behind a new
/// front end, or to stub it out in transport tests.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Register and launch a job. Never blocks on the process; failures show
    /// up later on the job's status.
    async fn start_job(&self, request: JobRequest) -> JobStatus;

    async fn get_job_status(&self, id: JobId) -> Result<JobStatus>;

    /// Send a termination signal to a running job and return its status
    async fn stop_job(&self, id: JobId) -> Result<JobStatus>;

    /// Ids of jobs started strictly after `since` (all jobs if `None`)
    async fn list_jobs_since(&self, since: Option<DateTime<Utc>>) -> Vec<JobId>;
}
