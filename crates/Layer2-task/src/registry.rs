//! Job registry - id allocation and the id → handle map
//!
//! Jobs are never removed; the map grows for the lifetime of the agent.

use crate::handle::JobHandle;
use crate::job::{JobId, JobRequest};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct JobRegistry {
    /// All jobs by ID
    jobs: RwLock<HashMap<JobId, Arc<JobHandle>>>,

    /// Next id to hand out. Only advanced while `jobs` is write-locked.
    next_id: AtomicU64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and register a NotStarted job under it.
    ///
    /// Allocation and insertion happen under the same write lock, so readers
    /// never see an allocated id that is missing from the map.
    pub async fn new_job(&self, request: JobRequest) -> Arc<JobHandle> {
        let mut jobs = self.jobs.write().await;
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = Arc::new(JobHandle::new(id, request));
        jobs.insert(id, Arc::clone(&handle));
        handle
    }

    pub async fn lookup(&self, id: JobId) -> Option<Arc<JobHandle>> {
        self.jobs.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// All handles, ascending by id
    pub async fn handles(&self) -> Vec<Arc<JobHandle>> {
        let mut handles: Vec<_> = self.jobs.read().await.values().cloned().collect();
        handles.sort_by_key(|h| h.id());
        handles
    }

    /// Ids of jobs started strictly after `since`, ascending
    pub async fn ids_started_after(&self, since: DateTime<Utc>) -> Vec<JobId> {
        let jobs = self.jobs.read().await;
        let mut ids: Vec<JobId> = jobs
            .values()
            .filter(|job| job.start_time() > since)
            .map(|job| job.id())
            .collect();
        ids.sort_unstable();
        ids
    }
}
