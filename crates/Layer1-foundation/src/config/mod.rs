//! Config - agent settings
//!
//! - `agent.rs` - AgentConfig (whitelist, output, logging)

mod agent;

pub use agent::{AgentConfig, LogConfig, OutputConfig, AGENT_CONFIG_FILE};
