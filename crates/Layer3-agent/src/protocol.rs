//! Wire types for the line-delimited JSON transport
//!
//! One request object per line in, one response object per line out.

use chrono::{DateTime, Utc};
use rce_foundation::Error;
use rce_task::{JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// Incoming request, tagged by `op`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    StartJob {
        name: String,
        command_name: String,
        #[serde(default)]
        args: Vec<String>,
    },
    GetJobStatus {
        job_id: JobId,
    },
    StopJob {
        job_id: JobId,
    },
    ListJobs {
        #[serde(default)]
        since: Option<DateTime<Utc>>,
    },
}

/// Outgoing response. Exactly one of `status`, `job_ids`, `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_ids: Option<Vec<JobId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u64>,
}

impl Response {
    pub fn status(status: JobStatus) -> Self {
        Self {
            ok: true,
            status: Some(status),
            job_ids: None,
            error: None,
        }
    }

    pub fn job_ids(ids: Vec<JobId>) -> Self {
        Self {
            ok: true,
            status: None,
            job_ids: Some(ids),
            error: None,
        }
    }

    pub fn error(err: &Error) -> Self {
        Self {
            ok: false,
            status: None,
            job_ids: None,
            error: Some(ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
                job_id: err.job_id(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requests() {
        let req: Request = serde_json::from_str(
            r#"{"op":"start_job","name":"t1","command_name":"echo-test","args":["hello"]}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            Request::StartJob {
                name: "t1".to_string(),
                command_name: "echo-test".to_string(),
                args: vec!["hello".to_string()],
            }
        );

        let req: Request = serde_json::from_str(r#"{"op":"stop_job","job_id":3}"#).unwrap();
        assert_eq!(req, Request::StopJob { job_id: JobId(3) });

        let req: Request = serde_json::from_str(r#"{"op":"list_jobs"}"#).unwrap();
        assert_eq!(req, Request::ListJobs { since: None });

        let req: Request =
            serde_json::from_str(r#"{"op":"list_jobs","since":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(req, Request::ListJobs { since: Some(_) }));
    }

    #[test]
    fn test_rejects_unknown_op() {
        assert!(serde_json::from_str::<Request>(r#"{"op":"delete_job","job_id":1}"#).is_err());
        assert!(serde_json::from_str::<Request>(r#"{"op":"get_job_status"}"#).is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let value =
            serde_json::to_value(Response::error(&Error::JobNotFound { id: 7 })).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["kind"], "job_not_found");
        assert_eq!(value["error"]["message"], "job=7: job not found");
        assert_eq!(value["error"]["job_id"], 7);
        assert!(value.get("status").is_none());
    }
}
