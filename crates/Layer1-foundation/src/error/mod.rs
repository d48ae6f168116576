//! Error types for rce-agent
//!
//! Every error the agent can return synchronously lives here. Failures that
//! happen while a job runs are recorded on the job's status instead.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// rce-agent error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Job lifecycle
    // ========================================================================
    #[error("job={id}: job not found")]
    JobNotFound { id: u64 },

    #[error("job={id}: job not running")]
    JobNotRunning { id: u64 },

    #[error("command not allowed: {command}")]
    CommandNotAllowed { command: String },

    #[error("failed to spawn {command}: {message}")]
    ProcessSpawnFailed { command: String, message: String },

    #[error("job={id}: failed to signal pid {pid}: {message}")]
    SignalDeliveryFailed { id: u64, pid: u32, message: String },

    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Transport
    // ========================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ========================================================================
    // External errors
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            Error::JobNotFound { .. } => "job_not_found",
            Error::JobNotRunning { .. } => "job_not_running",
            Error::CommandNotAllowed { .. } => "command_not_allowed",
            Error::ProcessSpawnFailed { .. } => "process_spawn_failed",
            Error::SignalDeliveryFailed { .. } => "signal_delivery_failed",
            Error::Config(_) => "config",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }

    /// Job id the error refers to, if any
    pub fn job_id(&self) -> Option<u64> {
        match self {
            Error::JobNotFound { id }
            | Error::JobNotRunning { id }
            | Error::SignalDeliveryFailed { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn command_not_allowed(command: impl Into<String>) -> Self {
        Error::CommandNotAllowed {
            command: command.into(),
        }
    }

    pub fn spawn_failed(command: impl Into<String>, message: impl ToString) -> Self {
        Error::ProcessSpawnFailed {
            command: command.into(),
            message: message.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_id_qualified() {
        assert_eq!(
            Error::JobNotFound { id: 7 }.to_string(),
            "job=7: job not found"
        );
        assert_eq!(
            Error::JobNotRunning { id: 3 }.to_string(),
            "job=3: job not running"
        );

        let err = Error::SignalDeliveryFailed {
            id: 2,
            pid: 4242,
            message: "ESRCH: No such process".to_string(),
        };
        assert!(err.to_string().starts_with("job=2: failed to signal pid 4242"));
    }

    #[test]
    fn test_kind_and_job_id() {
        let err = Error::command_not_allowed("rm");
        assert_eq!(err.kind(), "command_not_allowed");
        assert_eq!(err.job_id(), None);

        let err = Error::JobNotRunning { id: 9 };
        assert_eq!(err.kind(), "job_not_running");
        assert_eq!(err.job_id(), Some(9));
    }
}
