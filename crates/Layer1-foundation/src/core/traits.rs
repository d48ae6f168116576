//! Core Traits - collaborator contracts
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Layer3-agent  (transport, CLI)                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer2-task   (registry, runner, collectors)               │
//! │  └── asks a CommandResolver before every spawn              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer1-foundation (this layer)                             │
//! │  ├── CommandResolver trait                                  │
//! │  └── CommandWhitelist (static implementation)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// CommandResolver - whitelist lookup
// ============================================================================

/// Maps a command name to the executable the agent is allowed to spawn.
///
/// Returning `None` means the command is not allowed. Implementations must be
/// cheap and non-blocking; the runner calls this from inside a job task.
pub trait CommandResolver: Send + Sync {
    fn resolve(&self, command_name: &str) -> Option<PathBuf>;
}

impl<T: CommandResolver + ?Sized> CommandResolver for Arc<T> {
    fn resolve(&self, command_name: &str) -> Option<PathBuf> {
        (**self).resolve(command_name)
    }
}
