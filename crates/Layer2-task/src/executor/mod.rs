//! Job execution
//!
//! - `JobRunner` - supervises one job's process through its lifecycle
//! - `OutputCollector` - drains one stdout/stderr pipe into the job status
//! - `signal` - SIGTERM delivery and exit status classification

pub mod collector;
pub mod runner;
pub mod signal;

pub use collector::OutputCollector;
pub use runner::JobRunner;
pub use signal::{classify_exit, send_terminate};
