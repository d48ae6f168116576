//! Job Manager - the agent's job lifecycle entry point
//!
//! Features:
//! - Non-blocking job submission
//! - Status snapshots by id
//! - Termination of running jobs
//! - Listing jobs by start time

use crate::executor::{send_terminate, JobRunner};
use crate::job::{JobId, JobRequest, JobStatus};
use crate::registry::JobRegistry;
use crate::service::JobService;
use crate::state::JobState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rce_foundation::{AgentConfig, CommandResolver, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stop failure reason when the process is gone but a pipe is still open,
/// e.g. held by a background grandchild
pub const OUTPUT_DRAINING: &str = "process exited, output still draining";

/// Configuration for job manager
#[derive(Debug, Clone, Default)]
pub struct JobManagerConfig {
    /// Keep a final output line that lacks a trailing newline
    pub keep_partial_line: bool,
}

impl From<&AgentConfig> for JobManagerConfig {
    fn from(config: &AgentConfig) -> Self {
        Self {
            keep_partial_line: config.output.keep_partial_line,
        }
    }
}

/// Job Manager - handles job lifecycle and execution
#[derive(Clone)]
pub struct JobManager {
    /// All jobs by ID
    registry: Arc<JobRegistry>,

    /// Whitelist lookup
    resolver: Arc<dyn CommandResolver>,

    /// Configuration
    config: Arc<JobManagerConfig>,
}

impl JobManager {
    pub fn new(resolver: Arc<dyn CommandResolver>, config: JobManagerConfig) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            resolver,
            config: Arc::new(config),
        }
    }

    /// Build from a loaded agent config (whitelist + output settings)
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            Arc::new(config.commands.clone()),
            JobManagerConfig::from(config),
        )
    }

    pub fn registry(&self) -> Arc<JobRegistry> {
        Arc::clone(&self.registry)
    }

    /// Register a job and launch its runner task.
    ///
    /// The returned status is taken before the runner starts, so it is always
    /// NotStarted.
    pub async fn start_job(&self, request: JobRequest) -> JobStatus {
        let job = self.registry.new_job(request).await;
        info!(
            "job={}: New job received (name: {}, commandName: {}, args: \"{}\").",
            job.id(),
            job.name(),
            job.command_name(),
            job.args().join(" ")
        );

        let status = job.snapshot();
        JobRunner::new(job, Arc::clone(&self.resolver))
            .keep_partial_line(self.config.keep_partial_line)
            .spawn();
        status
    }

    pub async fn get_job_status(&self, id: JobId) -> Result<JobStatus> {
        debug!("job={}: Status request received.", id);
        let job = self
            .registry
            .lookup(id)
            .await
            .ok_or(Error::JobNotFound { id: id.as_u64() })?;
        Ok(job.snapshot())
    }

    /// Send SIGTERM to a running job's process.
    ///
    /// Does not wait for the process to exit and never changes the status
    /// itself; the job's runner records the exit. Poll afterwards.
    pub async fn stop_job(&self, id: JobId) -> Result<JobStatus> {
        info!("job={}: Stop request received.", id);
        let job = self
            .registry
            .lookup(id)
            .await
            .ok_or(Error::JobNotFound { id: id.as_u64() })?;

        let (state, pid) = job.state_and_pid();
        if state != JobState::Running {
            return Err(Error::JobNotRunning { id: id.as_u64() });
        }
        if job.process_exited() {
            // Reaped but not yet finalized; the pid is no longer ours to signal
            return Err(Error::SignalDeliveryFailed {
                id: id.as_u64(),
                pid,
                message: OUTPUT_DRAINING.to_string(),
            });
        }

        send_terminate(pid).map_err(|message| {
            warn!("job={}: Error signalling pid {}: {}", id, pid, message);
            Error::SignalDeliveryFailed {
                id: id.as_u64(),
                pid,
                message,
            }
        })?;

        info!("job={}: Sent SIGTERM to pid {}", id, pid);
        Ok(job.snapshot())
    }

    /// Ids of jobs started strictly after `since`, ascending. `None` lists all.
    pub async fn list_jobs_since(&self, since: Option<DateTime<Utc>>) -> Vec<JobId> {
        debug!("Listing jobs since {:?}", since);
        match since {
            Some(since) => self.registry.ids_started_after(since).await,
            None => self
                .registry
                .handles()
                .await
                .iter()
                .map(|job| job.id())
                .collect(),
        }
    }

    /// Poll until the job is Completed
    pub async fn wait(&self, id: JobId, poll_interval: Duration) -> Result<JobStatus> {
        loop {
            let status = self.get_job_status(id).await?;
            if status.state.is_terminal() {
                return Ok(status);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Count of jobs currently in the Running state
    pub async fn running_count(&self) -> usize {
        self.registry
            .handles()
            .await
            .iter()
            .filter(|job| job.state().is_running())
            .count()
    }
}

#[async_trait]
impl JobService for JobManager {
    async fn start_job(&self, request: JobRequest) -> JobStatus {
        JobManager::start_job(self, request).await
    }

    async fn get_job_status(&self, id: JobId) -> Result<JobStatus> {
        JobManager::get_job_status(self, id).await
    }

    async fn stop_job(&self, id: JobId) -> Result<JobStatus> {
        JobManager::stop_job(self, id).await
    }

    async fn list_jobs_since(&self, since: Option<DateTime<Utc>>) -> Vec<JobId> {
        JobManager::list_jobs_since(self, since).await
    }
}
