//! # rce-foundation
//!
//! Foundation layer for rce-agent:
//! - Error: the agent-wide error enum and `Result` alias
//! - Core: collaborator contracts (`CommandResolver`)
//! - Registry: the static command whitelist
//! - Config: TOML agent configuration

pub mod config;
pub mod core;
pub mod error;
pub mod registry;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core
// ============================================================================
pub use core::CommandResolver;

// ============================================================================
// Registry / Config
// ============================================================================
pub use config::{AgentConfig, LogConfig, OutputConfig, AGENT_CONFIG_FILE};
pub use registry::CommandWhitelist;
