//! # rce-task
//!
//! Job lifecycle and execution engine for rce-agent.
//!
//! ## Features
//!
//! - Monotonic job ids and a concurrency-safe job registry
//! - Non-blocking submission: every job runs on its own task
//! - Concurrent stdout/stderr capture while the process runs
//! - Consistent status snapshots under concurrent readers and writers
//! - Termination of running jobs by signal

pub mod executor;
pub mod handle;
pub mod job;
pub mod manager;
pub mod registry;
pub mod service;
pub mod state;

pub use executor::{JobRunner, OutputCollector};
pub use handle::{JobHandle, OutputStream};
pub use job::{JobId, JobRequest, JobStatus, NO_EXIT_CODE};
pub use manager::{JobManager, JobManagerConfig, OUTPUT_DRAINING};
pub use registry::JobRegistry;
pub use service::JobService;
pub use state::JobState;
