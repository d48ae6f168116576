//! Job handle - one job's mutable status behind per-substructure locks
//!
//! Lock layout:
//! - `status`: state, pid, exit code, error, finish time
//! - `stdout`: captured stdout lines
//! - `stderr`: captured stderr lines
//!
//! Collectors append under their own stream lock only, so the two collectors
//! and the runner never contend with each other. `snapshot` takes all three in
//! the fixed order status → stdout → stderr. None of these locks is ever held
//! across an `.await`.

use crate::job::{JobId, JobRequest, JobStatus, NO_EXIT_CODE};
use crate::state::JobState;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::warn;

/// Which output stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

impl std::fmt::Display for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Lifecycle {
    state: JobState,
    pid: u32,
    exit_code: i32,
    error: String,
    finish_time: Option<DateTime<Utc>>,
    /// Process reaped; its pid may already belong to someone else
    exited: bool,
}

/// Shared handle to one job.
///
/// Immutable request data lives outside the locks.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    name: String,
    command_name: String,
    args: Vec<String>,
    start_time: DateTime<Utc>,

    status: Mutex<Lifecycle>,
    stdout: Mutex<Vec<String>>,
    stderr: Mutex<Vec<String>>,
}

impl JobHandle {
    pub(crate) fn new(id: JobId, request: JobRequest) -> Self {
        Self {
            id,
            name: request.name,
            command_name: request.command_name,
            args: request.args,
            start_time: Utc::now(),
            status: Mutex::new(Lifecycle {
                state: JobState::NotStarted,
                pid: 0,
                exit_code: NO_EXIT_CODE,
                error: String::new(),
                finish_time: None,
                exited: false,
            }),
            stdout: Mutex::new(Vec::new()),
            stderr: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn state(&self) -> JobState {
        self.status.lock().state
    }

    /// Current state and pid, read together
    pub fn state_and_pid(&self) -> (JobState, u32) {
        let status = self.status.lock();
        (status.state, status.pid)
    }

    /// Whether the runner has reaped the process (the job may still show
    /// Running while its output is drained)
    pub fn process_exited(&self) -> bool {
        self.status.lock().exited
    }

    // ========== Snapshot ==========

    /// Fully consistent deep copy of the job's status
    pub fn snapshot(&self) -> JobStatus {
        // Acquire status → stdout → stderr; guards drop in reverse.
        let status = self.status.lock();
        let stdout = self.stdout.lock();
        let stderr = self.stderr.lock();

        JobStatus {
            job_id: self.id,
            job_name: self.name.clone(),
            command_name: self.command_name.clone(),
            state: status.state,
            pid: status.pid,
            start_time: self.start_time,
            finish_time: status.finish_time,
            exit_code: status.exit_code,
            error: status.error.clone(),
            stdout: stdout.clone(),
            stderr: stderr.clone(),
            args: self.args.clone(),
        }
    }

    // ========== Mutators (runner / collectors only) ==========

    /// NotStarted → Running. Returns false if the transition is not allowed.
    pub(crate) fn set_running(&self, pid: u32) -> bool {
        let mut status = self.status.lock();
        if !status.state.can_transition_to(JobState::Running) {
            warn!(
                "job={}: ignoring Running transition from {}",
                self.id, status.state
            );
            return false;
        }
        status.state = JobState::Running;
        status.pid = pid;
        true
    }

    pub(crate) fn mark_exited(&self) {
        self.status.lock().exited = true;
    }

    pub(crate) fn append(&self, stream: OutputStream, line: String) {
        match stream {
            OutputStream::Stdout => self.append_stdout(line),
            OutputStream::Stderr => self.append_stderr(line),
        }
    }

    pub(crate) fn append_stdout(&self, line: impl Into<String>) {
        self.stdout.lock().push(line.into());
    }

    pub(crate) fn append_stderr(&self, line: impl Into<String>) {
        self.stderr.lock().push(line.into());
    }

    /// Any state → Completed with an exit code and error message.
    /// Returns false if the job was already Completed.
    pub(crate) fn complete(&self, exit_code: i32, error: impl Into<String>) -> bool {
        let mut status = self.status.lock();
        if !status.state.can_transition_to(JobState::Completed) {
            warn!("job={}: ignoring second completion", self.id);
            return false;
        }
        // Clamp against wall-clock steps backwards
        status.finish_time = Some(Utc::now().max(self.start_time));
        status.exit_code = exit_code;
        status.error = error.into();
        status.state = JobState::Completed;
        status.exited = true;
        true
    }

    /// Completed without a process exit (exit code stays unset)
    pub(crate) fn fail(&self, error: impl Into<String>) -> bool {
        self.complete(NO_EXIT_CODE, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn handle() -> JobHandle {
        JobHandle::new(JobId(0), JobRequest::new("t1", "echo-test").arg("hello"))
    }

    #[test]
    fn test_initial_snapshot() {
        let status = handle().snapshot();
        assert_eq!(status.job_id, JobId(0));
        assert_eq!(status.job_name, "t1");
        assert_eq!(status.command_name, "echo-test");
        assert_eq!(status.state, JobState::NotStarted);
        assert_eq!(status.pid, 0);
        assert_eq!(status.exit_code, NO_EXIT_CODE);
        assert!(status.error.is_empty());
        assert!(status.finish_time.is_none());
        assert_eq!(status.args, vec!["hello"]);
    }

    #[test]
    fn test_lifecycle() {
        let job = handle();
        assert!(job.set_running(4242));
        job.append_stdout("a");
        job.append_stderr("oops");
        job.append_stdout("b");
        assert!(job.complete(0, ""));

        let status = job.snapshot();
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(status.pid, 4242);
        assert_eq!(status.exit_code, 0);
        assert_eq!(status.stdout, vec!["a", "b"]);
        assert_eq!(status.stderr, vec!["oops"]);
        assert!(status.finish_time.unwrap() >= status.start_time);
        assert!(status.is_success());
    }

    #[test]
    fn test_no_regression() {
        let job = handle();
        assert!(job.fail("Unable to find command"));
        assert!(!job.set_running(1));
        assert!(!job.complete(0, ""));

        let status = job.snapshot();
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(status.pid, 0);
        assert_eq!(status.exit_code, NO_EXIT_CODE);
        assert_eq!(status.error, "Unable to find command");
    }

    #[test]
    fn test_mark_exited() {
        let job = handle();
        job.set_running(10);
        assert!(!job.process_exited());
        job.mark_exited();
        assert!(job.process_exited());
        // Still Running until the runner publishes Completed
        assert_eq!(job.state(), JobState::Running);
    }

    #[test]
    fn test_running_twice_rejected() {
        let job = handle();
        assert!(job.set_running(10));
        assert!(!job.set_running(11));
        assert_eq!(job.state_and_pid(), (JobState::Running, 10));
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let job = handle();
        job.append_stdout("first");
        let before = job.snapshot();
        job.append_stdout("second");
        assert_eq!(before.stdout, vec!["first"]);
        assert_eq!(job.snapshot().stdout, vec!["first", "second"]);
    }

    #[test]
    fn test_concurrent_snapshots_never_torn() {
        let job = Arc::new(handle());

        let writer = {
            let job = Arc::clone(&job);
            std::thread::spawn(move || {
                job.set_running(777);
                for i in 0..500 {
                    job.append_stdout(format!("line {}", i));
                }
                job.complete(0, "");
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let job = Arc::clone(&job);
                std::thread::spawn(move || {
                    let mut last_len = 0;
                    loop {
                        let status = job.snapshot();
                        match status.state {
                            JobState::NotStarted => {
                                assert_eq!(status.pid, 0);
                                assert!(status.finish_time.is_none());
                            }
                            JobState::Running => {
                                assert_eq!(status.pid, 777);
                                assert!(status.finish_time.is_none());
                                assert_eq!(status.exit_code, NO_EXIT_CODE);
                            }
                            JobState::Completed => {
                                assert!(status.finish_time.is_some());
                                assert_eq!(status.stdout.len(), 500);
                                break;
                            }
                        }
                        // Append-only: every read sees a longer or equal prefix
                        assert!(status.stdout.len() >= last_len);
                        for (i, line) in status.stdout.iter().enumerate() {
                            assert_eq!(line, &format!("line {}", i));
                        }
                        last_len = status.stdout.len();
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
