//! Job definition and types

use crate::state::JobState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exit code reported until a process exit has been observed
pub const NO_EXIT_CODE: i32 = -1;

/// Unique identifier for a job.
///
/// Allocated by the registry in strictly increasing order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to run one whitelisted command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Free-form job name chosen by the caller
    pub name: String,

    /// Key into the command whitelist
    pub command_name: String,

    /// Arguments passed verbatim to the executable
    #[serde(default)]
    pub args: Vec<String>,
}

impl JobRequest {
    pub fn new(name: impl Into<String>, command_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_name: command_name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Point-in-time view of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: JobId,
    pub job_name: String,
    pub command_name: String,
    pub state: JobState,

    /// OS process id, 0 until the process has been spawned
    pub pid: u32,

    pub start_time: DateTime<Utc>,

    /// Set only once the job is Completed
    pub finish_time: Option<DateTime<Utc>>,

    /// `NO_EXIT_CODE` until the process exit is classified
    pub exit_code: i32,

    /// Empty when there is no error
    pub error: String,

    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub args: Vec<String>,
}

impl JobStatus {
    /// Time between start and finish, once finished
    pub fn duration(&self) -> Option<Duration> {
        let finish = self.finish_time?;
        Some((finish - self.start_time).to_std().unwrap_or_default())
    }

    /// Completed with exit code 0 and no error
    pub fn is_success(&self) -> bool {
        self.state.is_terminal() && self.exit_code == 0 && self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = JobRequest::new("t1", "echo-test")
            .arg("hello")
            .args(["a", "b"]);
        assert_eq!(request.args, vec!["hello", "a", "b"]);
    }

    #[test]
    fn test_request_args_default() {
        let request: JobRequest =
            serde_json::from_str(r#"{"name":"t1","command_name":"echo-test"}"#).unwrap();
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_job_id_display() {
        assert_eq!(JobId(42).to_string(), "42");
        assert_eq!(serde_json::to_string(&JobId(42)).unwrap(), "42");
    }
}
