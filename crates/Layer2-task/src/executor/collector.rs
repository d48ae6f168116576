//! Output collector - drains one process stream into a job's status
//!
//! One collector runs per stream per job, as its own task. Each complete line
//! is whitespace-trimmed and appended under that stream's lock.
//!
//! Stream handling rules:
//! - a final line without a trailing `\n` is dropped unless
//!   `keep_partial_line` is set
//! - read errors other than end-of-stream stop collection without touching the
//!   job status; they are only logged

use crate::handle::{JobHandle, OutputStream};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct OutputCollector {
    job: Arc<JobHandle>,
    stream: OutputStream,
    keep_partial_line: bool,
}

impl OutputCollector {
    pub fn new(job: Arc<JobHandle>, stream: OutputStream) -> Self {
        Self {
            job,
            stream,
            keep_partial_line: false,
        }
    }

    pub fn keep_partial_line(mut self, keep: bool) -> Self {
        self.keep_partial_line = keep;
        self
    }

    /// Run on its own task
    pub fn spawn<R>(self, reader: R) -> JoinHandle<usize>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(self.collect(reader))
    }

    /// Read until end-of-stream. Returns the number of lines captured.
    pub async fn collect<R>(self, reader: R) -> usize
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut captured = 0;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    // Only the last read of a stream can lack the delimiter
                    if buf.last() != Some(&b'\n') && !self.keep_partial_line {
                        debug!(
                            "job={}: dropping unterminated final {} line ({} bytes)",
                            self.job.id(),
                            self.stream,
                            buf.len()
                        );
                        break;
                    }
                    let line = String::from_utf8_lossy(&buf).trim().to_string();
                    self.job.append(self.stream, line);
                    captured += 1;
                }
                Err(e) => {
                    warn!(
                        "job={}: {} read failed after {} lines: {}",
                        self.job.id(),
                        self.stream,
                        captured,
                        e
                    );
                    break;
                }
            }
        }

        captured
    }
}
