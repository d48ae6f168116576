//! Stdio transport - line-delimited JSON over stdin/stdout
//!
//! A local front end for the job service. Each input line is one `Request`;
//! each produces exactly one `Response` line. Malformed lines get an
//! `invalid_request` error and the loop keeps going. EOF ends the session.

use crate::protocol::{Request, Response};
use rce_foundation::{Error, Result};
use rce_task::{JobRequest, JobService};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub struct StdioTransport {
    service: Arc<dyn JobService>,
}

impl StdioTransport {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }

    /// Serve the process's own stdin/stdout
    pub async fn serve_stdio(&self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve until `reader` hits EOF. Returns the first I/O error.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut handled = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // Bad UTF-8 is a malformed request, not a transport failure
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("request: {}", line);
                    match serde_json::from_str::<Request>(line) {
                        Ok(request) => self.dispatch(request).await,
                        Err(e) => Response::error(&Error::InvalidRequest(e.to_string())),
                    }
                }
                Err(e) => {
                    warn!("Request is not valid UTF-8: {}", e);
                    Response::error(&Error::InvalidRequest(e.to_string()))
                }
            };

            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
            handled += 1;
        }

        info!("Transport input closed after {} requests", handled);
        Ok(())
    }

    async fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::StartJob {
                name,
                command_name,
                args,
            } => {
                let request = JobRequest {
                    name,
                    command_name,
                    args,
                };
                Response::status(self.service.start_job(request).await)
            }
            Request::GetJobStatus { job_id } => match self.service.get_job_status(job_id).await {
                Ok(status) => Response::status(status),
                Err(e) => Response::error(&e),
            },
            Request::StopJob { job_id } => match self.service.stop_job(job_id).await {
                Ok(status) => Response::status(status),
                Err(e) => Response::error(&e),
            },
            Request::ListJobs { since } => {
                Response::job_ids(self.service.list_jobs_since(since).await)
            }
        }
    }
}
