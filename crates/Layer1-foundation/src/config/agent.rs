//! Agent Config - TOML configuration loaded once at startup
//!
//! ```toml
//! [commands]
//! echo-test = "/bin/echo"
//!
//! [output]
//! keep_partial_line = false
//!
//! [log]
//! level = "info"
//! ```

use crate::registry::CommandWhitelist;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default config file name
pub const AGENT_CONFIG_FILE: &str = "agent.toml";

// ============================================================================
// Agent Config
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Whitelist of runnable commands
    #[serde(default)]
    pub commands: CommandWhitelist,

    /// Output capture settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl AgentConfig {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        debug!(
            "Loaded {} whitelisted commands from {}",
            config.commands.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// ============================================================================
// Output Config
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Keep a final line that has no trailing newline.
    /// Off by default: such a line is dropped, matching the agent's historical output.
    #[serde(default)]
    pub keep_partial_line: bool,
}

// ============================================================================
// Log Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
