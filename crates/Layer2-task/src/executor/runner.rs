//! Job runner - supervises one job's process from resolve to completion
//!
//! ```text
//! resolve ──✗──► Completed (error, exit -1)
//!    │
//! spawn ───✗──► Completed (error, exit -1)
//!    │
//! Running(pid) ─► collectors ×2 ─► wait exit ─► join collectors ─► Completed
//! ```
//!
//! Completed is only published after both collectors have finished, so the
//! captured output never changes once a reader sees Completed.

use crate::executor::collector::OutputCollector;
use crate::executor::signal::classify_exit;
use crate::handle::{JobHandle, OutputStream};
use rce_foundation::{CommandResolver, Error};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct JobRunner {
    job: Arc<JobHandle>,
    resolver: Arc<dyn CommandResolver>,
    keep_partial_line: bool,
}

impl JobRunner {
    pub fn new(job: Arc<JobHandle>, resolver: Arc<dyn CommandResolver>) -> Self {
        Self {
            job,
            resolver,
            keep_partial_line: false,
        }
    }

    pub fn keep_partial_line(mut self, keep: bool) -> Self {
        self.keep_partial_line = keep;
        self
    }

    /// Run the whole lifecycle on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let id = self.job.id();
        debug!("job={}: Running job.", id);

        let Some(program) = self.resolver.resolve(self.job.command_name()) else {
            let err = Error::command_not_allowed(self.job.command_name());
            warn!("job={}: {}", id, err);
            self.job.fail(err.to_string());
            return;
        };

        // Explicit argv, never a shell string
        let mut cmd = Command::new(&program);
        cmd.args(self.job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let err = Error::spawn_failed(program.display().to_string(), e);
                warn!("job={}: {}", id, err);
                self.job.fail(err.to_string());
                return;
            }
        };

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.start_kill();
            let _ = child.wait().await;
            let err = Error::spawn_failed(
                program.display().to_string(),
                "output pipes unavailable",
            );
            warn!("job={}: {}", id, err);
            self.job.fail(err.to_string());
            return;
        };

        let pid = child.id().unwrap_or_default();
        self.job.set_running(pid);
        info!("job={}: Command started (pid={}).", id, pid);

        let stdout_task = OutputCollector::new(Arc::clone(&self.job), OutputStream::Stdout)
            .keep_partial_line(self.keep_partial_line)
            .spawn(stdout);
        let stderr_task = OutputCollector::new(Arc::clone(&self.job), OutputStream::Stderr)
            .keep_partial_line(self.keep_partial_line)
            .spawn(stderr);

        let exit = child.wait().await;
        self.job.mark_exited();
        debug!("job={}: Process exited, draining output.", id);

        let (stdout_lines, stderr_lines) = futures::join!(stdout_task, stderr_task);
        for (stream, joined) in [
            (OutputStream::Stdout, stdout_lines),
            (OutputStream::Stderr, stderr_lines),
        ] {
            if let Err(e) = joined {
                warn!("job={}: {} collector failed: {}", id, stream, e);
            }
        }

        let (exit_code, error) = classify_exit(exit);
        self.job.complete(exit_code, error.clone());

        if error.is_empty() {
            info!("job={}: Job finished (exit_code={}).", id, exit_code);
        } else {
            info!(
                "job={}: Job finished (exit_code={}, error: {}).",
                id, exit_code, error
            );
        }
    }
}
